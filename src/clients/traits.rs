//! Store capability interfaces consumed by the collector

use async_trait::async_trait;
use std::fmt;
use crate::errors::StoreError;
use crate::types::{AppSummary, RawReview, SortOrder};

/// Google Play never returns more than this many reviews per page.
pub const ANDROID_MAX_PAGE_SIZE: usize = 150;

/// Size of one page of the App Store review feed.
pub const IOS_PAGE_SIZE: usize = 50;

/// One page of Play Store reviews plus the cursor for the next one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AndroidReviewPage {
    pub items: Vec<RawReview>,
    pub next_token: Option<String>,
}

/// Google Play back-end
#[async_trait]
pub trait AndroidStoreClient: Send + Sync {
    async fn search(&self, term: &str, limit: usize) -> Result<Vec<AppSummary>, StoreError>;

    /// Fetch one page of reviews; `token` is the cursor returned by the previous page.
    async fn fetch_reviews(
        &self,
        app_id: &str,
        page_size: usize,
        sort: SortOrder,
        token: Option<&str>,
    ) -> Result<AndroidReviewPage, StoreError>;
}

/// App Store identifier: the numeric track id or the bundle id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IosAppRef {
    Numeric(u64),
    Bundle(String),
}

impl IosAppRef {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.parse::<u64>() {
            Ok(id) if raw.chars().all(|c| c.is_ascii_digit()) => IosAppRef::Numeric(id),
            _ => IosAppRef::Bundle(raw.to_string()),
        }
    }
}

impl fmt::Display for IosAppRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IosAppRef::Numeric(id) => write!(f, "{id}"),
            IosAppRef::Bundle(bundle) => f.write_str(bundle),
        }
    }
}

/// App Store back-end
#[async_trait]
pub trait IosStoreClient: Send + Sync {
    async fn search(
        &self,
        term: &str,
        limit: usize,
        country: &str,
    ) -> Result<Vec<AppSummary>, StoreError>;

    /// Fetch review page `page` (1-based). An empty page means the feed is exhausted.
    async fn fetch_reviews(
        &self,
        app: &IosAppRef,
        country: &str,
        sort: SortOrder,
        page: u32,
    ) -> Result<Vec<RawReview>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ios_app_ref_parse() {
        assert_eq!(IosAppRef::parse("389801252"), IosAppRef::Numeric(389801252));
        assert_eq!(IosAppRef::parse(" 42 "), IosAppRef::Numeric(42));
        assert_eq!(
            IosAppRef::parse("com.example.app"),
            IosAppRef::Bundle("com.example.app".to_string())
        );
        assert_eq!(IosAppRef::parse("+42"), IosAppRef::Bundle("+42".to_string()));
        assert_eq!(IosAppRef::parse("123abc").to_string(), "123abc");
    }
}
