use crate::errors::{invalid_configuration, CollectError};
use crate::types::review::Platform;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

/// Highest star rating a store hands out.
pub const MAX_STAR_RATING: u8 = 5;

/// Which stores a fetch should query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformSelector {
    Android,
    Ios,
    #[default]
    Both,
}

impl PlatformSelector {
    pub fn includes(&self, platform: Platform) -> bool {
        matches!(
            (self, platform),
            (PlatformSelector::Both, _)
                | (PlatformSelector::Android, Platform::Android)
                | (PlatformSelector::Ios, Platform::Ios)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformSelector::Android => "android",
            PlatformSelector::Ios => "ios",
            PlatformSelector::Both => "both",
        }
    }
}

impl fmt::Display for PlatformSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlatformSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "android" => Ok(PlatformSelector::Android),
            "ios" => Ok(PlatformSelector::Ios),
            "both" => Ok(PlatformSelector::Both),
            other => Err(format!("unknown platform '{other}' (expected android, ios or both)")),
        }
    }
}

/// Date window recorded in the output: a month count, or `"all"` when unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthsFilter {
    Months(u32),
    All,
}

impl From<u32> for MonthsFilter {
    fn from(months: u32) -> Self {
        if months == 0 {
            MonthsFilter::All
        } else {
            MonthsFilter::Months(months)
        }
    }
}

impl Serialize for MonthsFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MonthsFilter::Months(n) => serializer.serialize_u32(*n),
            MonthsFilter::All => serializer.serialize_str("all"),
        }
    }
}

impl<'de> Deserialize<'de> for MonthsFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Count(u32),
            Label(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Count(n) => Ok(MonthsFilter::from(n)),
            Repr::Label(label) if label == "all" => Ok(MonthsFilter::All),
            Repr::Label(label) => Err(serde::de::Error::custom(format!(
                "invalid months filter '{label}'"
            ))),
        }
    }
}

/// Parameters of one collection run. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub android_app_id: String,
    pub ios_app_id: Option<String>,
    pub target_count: usize,
    pub max_rating: u8,
    /// Zero means no date window.
    pub months: u32,
    pub platform: PlatformSelector,
    pub country: String,
}

impl FetchRequest {
    pub fn new(
        android_app_id: &str,
        ios_app_id: Option<&str>,
        target_count: usize,
        max_rating: u8,
        months: u32,
        platform: PlatformSelector,
        country: &str,
    ) -> Result<Self, CollectError> {
        let android_app_id = android_app_id.trim();
        if android_app_id.is_empty() {
            return Err(invalid_configuration("a Play Store app id is required"));
        }
        if target_count == 0 {
            return Err(invalid_configuration("the number of reviews must be positive"));
        }
        if !(1..=MAX_STAR_RATING).contains(&max_rating) {
            return Err(invalid_configuration(format!(
                "max rating must be between 1 and {MAX_STAR_RATING}, got {max_rating}"
            )));
        }

        let ios_app_id = ios_app_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string);

        Ok(Self {
            android_app_id: android_app_id.to_string(),
            ios_app_id,
            target_count,
            max_rating,
            months,
            platform,
            country: country.trim().to_string(),
        })
    }

    pub fn has_window(&self) -> bool {
        self.months > 0
    }

    pub fn months_filter(&self) -> MonthsFilter {
        MonthsFilter::from(self.months)
    }

    pub fn wants_android(&self) -> bool {
        self.platform.includes(Platform::Android)
    }

    /// ios is only queried when selected and an App Store id was supplied.
    pub fn wants_ios(&self) -> bool {
        self.platform.includes(Platform::Ios) && self.ios_app_id.is_some()
    }

    /// Default artifact name: `reviews_<last segment of the Play id>.json`.
    pub fn default_output_name(&self) -> String {
        let tail = self
            .android_app_id
            .rsplit('.')
            .next()
            .unwrap_or(&self.android_app_id);
        format!("reviews_{tail}.json")
    }
}
