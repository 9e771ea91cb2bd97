use async_trait::async_trait;
use chrono::{SecondsFormat, TimeZone, Utc};
use reqwest::{Client, Response};
use scraper::{Html, Selector};
use serde_json::{json, Value};
use std::collections::HashSet;

use crate::config::StoreConfig;
use crate::errors::StoreError;
use crate::types::{AppSummary, RawReview, SortOrder};
use super::traits::{AndroidReviewPage, AndroidStoreClient, ANDROID_MAX_PAGE_SIZE};

const REVIEWS_RPC_ID: &str = "UsvDTd";
const DETAILS_LINK: &str = "/store/apps/details?id=";

/// Google Play client speaking the store's `batchexecute` RPC.
#[derive(Debug, Clone)]
pub struct PlayStoreClient {
    base_url: String,
    language: String,
    country: String,
    client: Client,
}

impl PlayStoreClient {
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            base_url: config.play_base_url.clone(),
            language: config.language.clone(),
            country: config.play_country.clone(),
            client,
        })
    }

    fn sort_code(sort: SortOrder) -> u8 {
        match sort {
            SortOrder::Newest => 2,
        }
    }

    /// `f.req` form value for one review page.
    fn review_request_body(app_id: &str, page_size: usize, sort: SortOrder, token: Option<&str>) -> String {
        let cursor = token.map_or(Value::Null, |t| Value::String(t.to_string()));
        let inner = json!([
            null,
            null,
            [2, Self::sort_code(sort), [page_size, null, cursor], null, []],
            [app_id, 7]
        ]);
        json!([[[REVIEWS_RPC_ID, inner.to_string(), null, "generic"]]]).to_string()
    }
}

pub(crate) fn ensure_success(response: Response, url: &str) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(StoreError::Status {
            status_code: status.as_u16(),
            url: url.to_string(),
        })
    }
}

/// Decode a `batchexecute` reply into a review page.
pub(crate) fn parse_review_response(body: &str) -> Result<AndroidReviewPage, StoreError> {
    // The payload is prefixed with the `)]}'` anti-hijacking guard.
    let start = body
        .find('[')
        .ok_or_else(|| StoreError::UnexpectedResponse("no JSON payload in review response".to_string()))?;
    let envelope: Value = serde_json::from_str(&body[start..])?;

    let inner = match envelope[0][2].as_str() {
        Some(inner) => inner,
        None => return Ok(AndroidReviewPage::default()),
    };
    let data: Value = serde_json::from_str(inner)?;

    let items = data[0]
        .as_array()
        .map(|reviews| reviews.iter().filter_map(parse_review).collect())
        .unwrap_or_default();
    let next_token = data[1][1].as_str().map(str::to_string);

    Ok(AndroidReviewPage { items, next_token })
}

fn parse_review(item: &Value) -> Option<RawReview> {
    let score = u8::try_from(item[2].as_u64()?).ok()?;

    let date = item[5][0].as_i64().and_then(|secs| {
        let nanos = item[5][1]
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(0);
        Utc.timestamp_opt(secs, nanos)
            .single()
            .map(|d| d.to_rfc3339_opts(SecondsFormat::Millis, true))
    });

    Some(RawReview {
        score,
        text: item[4].as_str().map(str::to_string),
        title: None,
        date,
        thumbs_up: item[6].as_u64().and_then(|n| u32::try_from(n).ok()),
    })
}

/// Pull app cards out of the Play search page.
pub(crate) fn parse_search_page(html: &str, limit: usize) -> Vec<AppSummary> {
    let document = Html::parse_document(html);
    let selector = match Selector::parse(r#"a[href*="/store/apps/details?id="]"#) {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };

    let mut seen = HashSet::new();
    let mut apps = Vec::new();

    for link in document.select(&selector) {
        let Some(href) = link.value().attr("href") else { continue };
        let Some(pos) = href.find(DETAILS_LINK) else { continue };
        let id = href[pos + DETAILS_LINK.len()..]
            .split('&')
            .next()
            .unwrap_or_default()
            .to_string();
        if id.is_empty() || !seen.insert(id.clone()) {
            continue;
        }

        let texts: Vec<&str> = link.text().map(str::trim).filter(|t| !t.is_empty()).collect();
        let title = link
            .value()
            .attr("aria-label")
            .map(str::to_string)
            .or_else(|| texts.first().map(|t| t.to_string()))
            .unwrap_or_else(|| id.clone());
        let developer = texts
            .iter()
            .skip(1)
            .find(|t| t.parse::<f64>().is_err())
            .map(|t| t.to_string())
            .unwrap_or_default();
        let score = texts
            .iter()
            .filter_map(|t| t.parse::<f64>().ok())
            .find(|s| (0.0..=5.0).contains(s));

        apps.push(AppSummary {
            id,
            bundle_id: None,
            title,
            score,
            developer,
        });
        if apps.len() >= limit {
            break;
        }
    }

    apps
}

#[async_trait]
impl AndroidStoreClient for PlayStoreClient {
    async fn search(&self, term: &str, limit: usize) -> Result<Vec<AppSummary>, StoreError> {
        let url = format!("{}/store/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", term),
                ("c", "apps"),
                ("hl", self.language.as_str()),
                ("gl", self.country.as_str()),
            ])
            .send()
            .await?;
        let html = ensure_success(response, &url)?.text().await?;

        Ok(parse_search_page(&html, limit))
    }

    async fn fetch_reviews(
        &self,
        app_id: &str,
        page_size: usize,
        sort: SortOrder,
        token: Option<&str>,
    ) -> Result<AndroidReviewPage, StoreError> {
        let url = format!("{}/_/PlayStoreUi/data/batchexecute", self.base_url);
        let body = Self::review_request_body(app_id, page_size.min(ANDROID_MAX_PAGE_SIZE), sort, token);

        log::debug!("Requesting {page_size} Play reviews for {app_id} (cursor: {token:?})");
        let response = self
            .client
            .post(&url)
            .query(&[
                ("rpcids", "qnKhOb"),
                ("hl", self.language.as_str()),
                ("gl", self.country.as_str()),
                ("authuser", ""),
                ("soc-app", "121"),
                ("soc-platform", "1"),
                ("soc-device", "1"),
            ])
            .form(&[("f.req", body)])
            .send()
            .await?;
        let text = ensure_success(response, &url)?.text().await?;

        parse_review_response(&text)
    }
}
