use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::{collections::HashMap, sync::Mutex};

use crate::config::StoreConfig;
use crate::errors::StoreError;
use crate::types::{AppSummary, RawReview, SortOrder};
use super::play_store::ensure_success;
use super::traits::{IosAppRef, IosStoreClient};

/// The customer-reviews feed serves at most this many pages.
pub const MAX_FEED_PAGES: u32 = 10;

/// App Store client built on the public iTunes search/lookup APIs and the
/// customer-reviews RSS feed.
#[derive(Debug)]
pub struct AppStoreClient {
    base_url: String,
    client: Client,
    resolved_ids: Mutex<HashMap<String, u64>>,
}

#[derive(Debug, Deserialize)]
struct ItunesResponse {
    #[serde(default)]
    results: Vec<ItunesApp>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItunesApp {
    track_id: u64,
    bundle_id: Option<String>,
    #[serde(default)]
    track_name: String,
    average_user_rating: Option<f64>,
    #[serde(default)]
    artist_name: String,
}

#[derive(Debug, Deserialize)]
struct FeedResponse {
    feed: Feed,
}

#[derive(Debug, Deserialize)]
struct Feed {
    entry: Option<OneOrMany<FeedEntry>>,
}

/// The feed collapses a single entry into a bare object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

#[derive(Debug, Deserialize)]
struct FeedEntry {
    #[serde(rename = "im:rating")]
    rating: Option<Label>,
    title: Option<Label>,
    content: Option<Label>,
    updated: Option<Label>,
}

#[derive(Debug, Deserialize)]
struct Label {
    label: String,
}

impl FeedEntry {
    /// Entries without a rating describe the app itself, not a review.
    fn into_review(self) -> Option<RawReview> {
        let score = self.rating?.label.trim().parse::<u8>().ok()?;
        Some(RawReview {
            score,
            text: self.content.map(|c| c.label),
            title: self.title.map(|t| t.label),
            date: self.updated.map(|u| u.label),
            thumbs_up: None,
        })
    }
}

pub(crate) fn parse_feed(body: &str) -> Result<Vec<RawReview>, StoreError> {
    let response: FeedResponse = serde_json::from_str(body)?;
    Ok(response
        .feed
        .entry
        .map(OneOrMany::into_vec)
        .unwrap_or_default()
        .into_iter()
        .filter_map(FeedEntry::into_review)
        .collect())
}

impl From<ItunesApp> for AppSummary {
    fn from(app: ItunesApp) -> Self {
        AppSummary {
            id: app.track_id.to_string(),
            bundle_id: app.bundle_id,
            title: app.track_name,
            score: app.average_user_rating,
            developer: app.artist_name,
        }
    }
}

impl AppStoreClient {
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            base_url: config.itunes_base_url.clone(),
            client,
            resolved_ids: Mutex::new(HashMap::new()),
        })
    }

    async fn get_itunes(&self, path: &str, query: &[(&str, &str)]) -> Result<ItunesResponse, StoreError> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self.client.get(&url).query(query).send().await?;
        let body = ensure_success(response, &url)?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Numeric track id for `app`, looking bundle ids up once per client.
    async fn track_id(&self, app: &IosAppRef, country: &str) -> Result<u64, StoreError> {
        let bundle = match app {
            IosAppRef::Numeric(id) => return Ok(*id),
            IosAppRef::Bundle(bundle) => bundle,
        };

        if let Some(id) = self.cached_id(bundle) {
            return Ok(id);
        }

        let lookup = self
            .get_itunes("lookup", &[("bundleId", bundle.as_str()), ("country", country)])
            .await?;
        let id = lookup
            .results
            .first()
            .map(|app| app.track_id)
            .ok_or_else(|| StoreError::NotFound(bundle.clone()))?;

        log::debug!("Resolved bundle {bundle} to App Store id {id}");
        if let Ok(mut cache) = self.resolved_ids.lock() {
            cache.insert(bundle.clone(), id);
        }
        Ok(id)
    }

    fn cached_id(&self, bundle: &str) -> Option<u64> {
        self.resolved_ids
            .lock()
            .ok()
            .and_then(|cache| cache.get(bundle).copied())
    }
}

#[async_trait]
impl IosStoreClient for AppStoreClient {
    async fn search(
        &self,
        term: &str,
        limit: usize,
        country: &str,
    ) -> Result<Vec<AppSummary>, StoreError> {
        let limit = limit.to_string();
        let response = self
            .get_itunes(
                "search",
                &[
                    ("term", term),
                    ("entity", "software"),
                    ("limit", limit.as_str()),
                    ("country", country),
                ],
            )
            .await?;

        Ok(response.results.into_iter().map(AppSummary::from).collect())
    }

    async fn fetch_reviews(
        &self,
        app: &IosAppRef,
        country: &str,
        sort: SortOrder,
        page: u32,
    ) -> Result<Vec<RawReview>, StoreError> {
        if page == 0 || page > MAX_FEED_PAGES {
            return Ok(Vec::new());
        }

        let id = self.track_id(app, country).await?;
        let sort_by = match sort {
            SortOrder::Newest => "mostrecent",
        };
        let url = format!(
            "{}/{}/rss/customerreviews/page={}/id={}/sortby={}/json",
            self.base_url,
            country.to_ascii_lowercase(),
            page,
            id,
            sort_by
        );

        log::debug!("Requesting App Store review page {page} for {id}");
        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(app.to_string()));
        }
        let body = ensure_success(response, &url)?.text().await?;

        parse_feed(&body)
    }
}
