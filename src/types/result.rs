use crate::types::request::{FetchRequest, MonthsFilter, PlatformSelector};
use crate::types::review::{NormalizedReview, Platform};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store identifiers of the app, as written to the artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreAppIds {
    pub play: String,
    pub ios: Option<String>,
}

/// The filters a run was asked for. Records the requested window even when the
/// all-time fallback ended up ignoring it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSummary {
    pub max_rating: u8,
    pub platform: PlatformSelector,
    pub country: String,
    pub requested: usize,
    pub months: MonthsFilter,
}

impl From<&FetchRequest> for FilterSummary {
    fn from(request: &FetchRequest) -> Self {
        Self {
            max_rating: request.max_rating,
            platform: request.platform,
            country: request.country.clone(),
            requested: request.target_count,
            months: request.months_filter(),
        }
    }
}

/// Terminal artifact of a collection run. Serializes to the JSON document the
/// report generator reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchResult {
    app_id: StoreAppIds,
    #[serde(with = "iso_millis")]
    fetch_date: DateTime<Utc>,
    filters: FilterSummary,
    total_fetched: usize,
    reviews: Vec<NormalizedReview>,
}

impl FetchResult {
    pub fn new(
        request: &FetchRequest,
        fetched_at: DateTime<Utc>,
        reviews: Vec<NormalizedReview>,
    ) -> Self {
        Self {
            app_id: StoreAppIds {
                play: request.android_app_id.clone(),
                ios: request.ios_app_id.clone(),
            },
            fetch_date: fetched_at,
            filters: FilterSummary::from(request),
            total_fetched: reviews.len(),
            reviews,
        }
    }

    pub fn app_id(&self) -> &StoreAppIds {
        &self.app_id
    }

    pub fn fetch_date(&self) -> DateTime<Utc> {
        self.fetch_date
    }

    pub fn filters(&self) -> &FilterSummary {
        &self.filters
    }

    pub fn total_fetched(&self) -> usize {
        self.total_fetched
    }

    pub fn reviews(&self) -> &[NormalizedReview] {
        &self.reviews
    }

    pub fn count_for(&self, platform: Platform) -> usize {
        self.reviews
            .iter()
            .filter(|r| r.platform == platform)
            .count()
    }
}

mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|d| d.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::review::RawReview;
    use chrono::TimeZone;

    fn sample_request(months: u32) -> FetchRequest {
        FetchRequest::new("com.x.y", None, 100, 3, months, PlatformSelector::Both, "us").unwrap()
    }

    #[test]
    fn test_artifact_shape() {
        let fetched_at = Utc.with_ymd_and_hms(2025, 3, 4, 5, 6, 7).unwrap();
        let reviews = vec![
            NormalizedReview::from_raw(Platform::Android, &RawReview::new(1).with_text("bad")),
            NormalizedReview::from_raw(Platform::Android, &RawReview::new(3).with_text("meh")),
        ];
        let result = FetchResult::new(&sample_request(0), fetched_at, reviews);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["appId"]["play"], "com.x.y");
        assert!(json["appId"]["ios"].is_null());
        assert_eq!(json["fetchDate"], "2025-03-04T05:06:07.000Z");
        assert_eq!(json["filters"]["maxRating"], 3);
        assert_eq!(json["filters"]["platform"], "both");
        assert_eq!(json["filters"]["country"], "us");
        assert_eq!(json["filters"]["requested"], 100);
        assert_eq!(json["filters"]["months"], "all");
        assert_eq!(json["totalFetched"], 2);
        assert_eq!(json["reviews"].as_array().unwrap().len(), 2);
        assert_eq!(json["reviews"][0]["thumbsUp"], 0);
    }

    #[test]
    fn test_total_matches_reviews() {
        let result = FetchResult::new(&sample_request(6), Utc::now(), Vec::new());
        assert_eq!(result.total_fetched(), result.reviews().len());
        assert_eq!(result.filters().months, MonthsFilter::Months(6));
    }

    #[test]
    fn test_artifact_reads_back() {
        let fetched_at = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();
        let result = FetchResult::new(&sample_request(2), fetched_at, Vec::new());
        let text = serde_json::to_string_pretty(&result).unwrap();
        let parsed: FetchResult = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, result);
    }
}
