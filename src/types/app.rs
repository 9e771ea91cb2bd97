use serde::{Deserialize, Serialize};

/// One search hit from either store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSummary {
    /// Play package name, or the numeric App Store id.
    pub id: String,
    /// App Store bundle identifier; Play apps have none.
    pub bundle_id: Option<String>,
    pub title: String,
    pub score: Option<f64>,
    pub developer: String,
}

impl AppSummary {
    /// `4.5`, or `N/A` when the store reported no rating.
    pub fn rating_label(&self) -> String {
        match self.score {
            Some(score) => format!("{score:.1}"),
            None => "N/A".to_string(),
        }
    }
}
