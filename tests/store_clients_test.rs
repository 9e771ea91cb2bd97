//! HTTP-level tests for both store clients against a local mock server.

use httpmock::prelude::*;
use serde_json::json;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use storepulse::clients::{AndroidStoreClient, AppStoreClient, IosAppRef, IosStoreClient, PlayStoreClient};
use storepulse::collector::ReviewCollector;
use storepulse::config::StoreConfig;
use storepulse::errors::StoreError;
use storepulse::types::{FetchRequest, Platform, PlatformSelector, SortOrder};

const BATCH_PATH: &str = "/_/PlayStoreUi/data/batchexecute";

fn play_reply(data: serde_json::Value) -> String {
    let envelope = json!([["wrb.fr", "UsvDTd", data.to_string(), null, null, null, "generic"]]);
    format!(")]}}'\n\n{envelope}")
}

fn feed_page(entries: serde_json::Value) -> String {
    json!({ "feed": { "author": { "name": { "label": "iTunes Store" } }, "entry": entries } }).to_string()
}

fn feed_entry(rating: u8, title: &str, updated: &str) -> serde_json::Value {
    json!({
        "im:rating": { "label": rating.to_string() },
        "title": { "label": title },
        "content": { "label": format!("{title} body"), "attributes": { "type": "text" } },
        "updated": { "label": updated }
    })
}

#[tokio::test]
async fn test_play_fetch_reviews_page() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(BATCH_PATH)
                .query_param("rpcids", "qnKhOb")
                .body_contains("UsvDTd")
                .body_contains("com.example.habits");
            then.status(200).body(play_reply(json!([
                [
                    ["a", ["Ana", null], 1, null, "Crashes on start", [1_735_689_600, 0], 3],
                    ["b", ["Bo", null], 4, null, "Fine", [1_735_603_200, 500_000_000], null]
                ],
                [null, "cursor-2"]
            ])));
        })
        .await;

    let client = PlayStoreClient::new(&StoreConfig::for_base_url(&server.base_url())).unwrap();
    let page = client
        .fetch_reviews("com.example.habits", 150, SortOrder::Newest, None)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].score, 1);
    assert_eq!(page.items[0].text.as_deref(), Some("Crashes on start"));
    assert_eq!(page.items[0].date.as_deref(), Some("2025-01-01T00:00:00.000Z"));
    assert_eq!(page.items[0].thumbs_up, Some(3));
    assert_eq!(page.items[1].date.as_deref(), Some("2024-12-31T00:00:00.500Z"));
    assert_eq!(page.next_token.as_deref(), Some("cursor-2"));
}

#[tokio::test]
async fn test_play_error_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(BATCH_PATH);
            then.status(503);
        })
        .await;

    let client = PlayStoreClient::new(&StoreConfig::for_base_url(&server.base_url())).unwrap();
    let err = client
        .fetch_reviews("com.example.habits", 10, SortOrder::Newest, Some("cursor"))
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::Status { status_code: 503, .. }));
}

#[tokio::test]
async fn test_play_search() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/store/search")
                .query_param("q", "habit tracker")
                .query_param("c", "apps");
            then.status(200).body(
                r#"<html><body>
                <a href="/store/apps/details?id=com.acme.habits" aria-label="Habit Tracker">
                    <span>Habit Tracker</span><span>Acme Inc</span><span>4.5</span>
                </a>
                <a href="/store/apps/details?id=com.acme.habits">duplicate</a>
                <a href="/store/apps/details?id=org.other.streaks&hl=en">
                    <span>Streaks</span><span>Other Org</span>
                </a>
                </body></html>"#,
            );
        })
        .await;

    let client = PlayStoreClient::new(&StoreConfig::for_base_url(&server.base_url())).unwrap();
    let apps = client.search("habit tracker", 5).await.unwrap();

    mock.assert_async().await;
    assert_eq!(apps.len(), 2);
    assert_eq!(apps[0].id, "com.acme.habits");
    assert_eq!(apps[0].title, "Habit Tracker");
    assert_eq!(apps[0].developer, "Acme Inc");
    assert_eq!(apps[0].rating_label(), "4.5");
    assert_eq!(apps[1].id, "org.other.streaks");
    assert_eq!(apps[1].rating_label(), "N/A");
}

#[tokio::test]
async fn test_app_store_search() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/search")
                .query_param("term", "habit tracker")
                .query_param("entity", "software")
                .query_param("limit", "5")
                .query_param("country", "us");
            then.status(200).json_body(json!({
                "resultCount": 1,
                "results": [{
                    "trackId": 987654321u64,
                    "bundleId": "com.acme.Habits",
                    "trackName": "Habit Tracker",
                    "averageUserRating": 4.71,
                    "artistName": "Acme Inc"
                }]
            }));
        })
        .await;

    let client = AppStoreClient::new(&StoreConfig::for_base_url(&server.base_url())).unwrap();
    let apps = client.search("habit tracker", 5, "us").await.unwrap();

    mock.assert_async().await;
    assert_eq!(apps.len(), 1);
    assert_eq!(apps[0].id, "987654321");
    assert_eq!(apps[0].bundle_id.as_deref(), Some("com.acme.Habits"));
    assert_eq!(apps[0].rating_label(), "4.7");
}

#[tokio::test]
async fn test_app_store_resolves_bundle_once() {
    let server = MockServer::start_async().await;
    let lookup = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/lookup")
                .query_param("bundleId", "com.acme.Habits");
            then.status(200)
                .json_body(json!({ "resultCount": 1, "results": [{ "trackId": 42u64 }] }));
        })
        .await;
    let page_one = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/gb/rss/customerreviews/page=1/id=42/sortby=mostrecent/json");
            then.status(200).body(feed_page(json!([
                feed_entry(2, "Sync broke", "2025-02-01T08:30:00-07:00"),
                feed_entry(5, "Love it", "2025-01-30T10:00:00-07:00")
            ])));
        })
        .await;
    let page_two = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/gb/rss/customerreviews/page=2/id=42/sortby=mostrecent/json");
            then.status(200).body(feed_page(json!(feed_entry(1, "Gone", "2025-01-02T00:00:00-07:00"))));
        })
        .await;

    let client = AppStoreClient::new(&StoreConfig::for_base_url(&server.base_url())).unwrap();
    let app = IosAppRef::parse("com.acme.Habits");

    let first = client.fetch_reviews(&app, "gb", SortOrder::Newest, 1).await.unwrap();
    let second = client.fetch_reviews(&app, "gb", SortOrder::Newest, 2).await.unwrap();

    assert_eq!(lookup.hits_async().await, 1);
    page_one.assert_async().await;
    page_two.assert_async().await;
    assert_eq!(first.len(), 2);
    assert_eq!(first[0].title.as_deref(), Some("Sync broke"));
    assert_eq!(first[0].date.as_deref(), Some("2025-02-01T08:30:00-07:00"));
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].score, 1);
}

#[tokio::test]
async fn test_app_store_unknown_bundle() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/lookup");
            then.status(200).json_body(json!({ "resultCount": 0, "results": [] }));
        })
        .await;

    let client = AppStoreClient::new(&StoreConfig::for_base_url(&server.base_url())).unwrap();
    let err = client
        .fetch_reviews(&IosAppRef::parse("com.nobody.app"), "us", SortOrder::Newest, 1)
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::NotFound(id) if id == "com.nobody.app"));
}

#[tokio::test]
async fn test_app_store_missing_feed_and_page_limit() {
    let server = MockServer::start_async().await;
    let feed = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/us/rss/customerreviews/page=1/id=555/sortby=mostrecent/json");
            then.status(404);
        })
        .await;

    let client = AppStoreClient::new(&StoreConfig::for_base_url(&server.base_url())).unwrap();
    let app = IosAppRef::Numeric(555);

    let err = client.fetch_reviews(&app, "us", SortOrder::Newest, 1).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));

    let beyond = client.fetch_reviews(&app, "us", SortOrder::Newest, 11).await.unwrap();
    assert!(beyond.is_empty());
    assert_eq!(feed.hits_async().await, 1);
}

#[tokio::test]
async fn test_collector_over_http() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(BATCH_PATH);
            then.status(200).body(play_reply(json!([
                [
                    ["a", ["Ana", null], 1, null, "Crashes", [1_735_689_600, 0], 3],
                    ["b", ["Bo", null], 5, null, "Great", [1_735_689_000, 0], 0]
                ],
                null
            ])));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/us/rss/customerreviews/page=1/id=777/sortby=mostrecent/json");
            then.status(200).body(feed_page(json!([
                feed_entry(3, "Meh", "2025-01-01T00:00:00-07:00"),
                feed_entry(4, "Okay", "2025-01-01T00:00:00-07:00")
            ])));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/us/rss/customerreviews/page=2/id=777/sortby=mostrecent/json");
            then.status(200).body(json!({ "feed": {} }).to_string());
        })
        .await;

    let config = StoreConfig::for_base_url(&server.base_url());
    let collector = ReviewCollector::new(
        Arc::new(PlayStoreClient::new(&config).unwrap()),
        Arc::new(AppStoreClient::new(&config).unwrap()),
    );
    let request =
        FetchRequest::new("com.example.habits", Some("777"), 100, 3, 0, PlatformSelector::Both, "us").unwrap();

    let result = collector
        .collect_at(&request, Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap())
        .await;

    assert_eq!(result.total_fetched(), 2);
    assert_eq!(result.reviews()[0].platform, Platform::Android);
    assert_eq!(result.reviews()[0].text, "Crashes");
    assert_eq!(result.reviews()[0].thumbs_up, 3);
    assert_eq!(result.reviews()[1].platform, Platform::Ios);
    assert_eq!(result.reviews()[1].title, "Meh");
}

#[tokio::test]
async fn test_feed_url_lowercases_country_but_artifact_keeps_it() {
    let server = MockServer::start_async().await;
    let feed = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/gb/rss/customerreviews/page=1/id=555/sortby=mostrecent/json");
            then.status(200).body(feed_page(json!([feed_entry(2, "Slow", "2025-01-20T00:00:00-07:00")])));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/gb/rss/customerreviews/page=2/id=555/sortby=mostrecent/json");
            then.status(200).body(json!({ "feed": {} }).to_string());
        })
        .await;

    let config = StoreConfig::for_base_url(&server.base_url());
    let collector = ReviewCollector::new(
        Arc::new(PlayStoreClient::new(&config).unwrap()),
        Arc::new(AppStoreClient::new(&config).unwrap()),
    );
    let request =
        FetchRequest::new("com.example.habits", Some("555"), 10, 5, 0, PlatformSelector::Ios, "GB").unwrap();

    let result = collector
        .collect_at(&request, Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap())
        .await;

    assert!(feed.hits_async().await >= 1);
    assert_eq!(result.total_fetched(), 1);
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["filters"]["country"], "GB");
}
