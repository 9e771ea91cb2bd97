use serde::{Deserialize, Serialize};
use std::fmt;

/// Store a review was collected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Android,
    Ios,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Android => "android",
            Platform::Ios => "ios",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Android => write!(f, "Android"),
            Platform::Ios => write!(f, "iOS"),
        }
    }
}

/// Requested ordering of a review page. Both stores are only ever asked for
/// newest-first pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Newest,
}

/// A review exactly as a store back-end handed it over.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawReview {
    pub score: u8,
    pub text: Option<String>,
    pub title: Option<String>,
    pub date: Option<String>,
    pub thumbs_up: Option<u32>,
}

impl RawReview {
    pub fn new(score: u8) -> Self {
        Self {
            score,
            ..Self::default()
        }
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn with_date(mut self, date: &str) -> Self {
        self.date = Some(date.to_string());
        self
    }

    pub fn with_thumbs_up(mut self, thumbs_up: u32) -> Self {
        self.thumbs_up = Some(thumbs_up);
        self
    }
}

/// The unit of output: one platform-tagged review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedReview {
    pub platform: Platform,
    pub score: u8,
    pub title: String,
    pub text: String,
    pub date: String,
    pub thumbs_up: u32,
}

impl NormalizedReview {
    /// Play Store reviews carry no title; App Store reviews carry no helpful votes.
    pub fn from_raw(platform: Platform, raw: &RawReview) -> Self {
        let (title, thumbs_up) = match platform {
            Platform::Android => (String::new(), raw.thumbs_up.unwrap_or(0)),
            Platform::Ios => (raw.title.clone().unwrap_or_default(), 0),
        };

        Self {
            platform,
            score: raw.score,
            title,
            text: raw.text.clone().unwrap_or_default(),
            date: raw.date.clone().unwrap_or_default(),
            thumbs_up,
        }
    }
}
