//! `search` command: look an app up on both stores and print its ids.

use anyhow::Result;

use crate::clients::{AndroidStoreClient, AppStoreClient, IosStoreClient, PlayStoreClient};
use crate::config::AppConfig;
use crate::types::AppSummary;

/// Hits shown per store.
pub const SEARCH_LIMIT: usize = 5;

pub async fn handle_command(config: &AppConfig, term: &str) -> Result<()> {
    let term = term.trim();
    if term.is_empty() {
        anyhow::bail!("Please provide a search term");
    }

    let play = PlayStoreClient::new(&config.stores)?;
    let app_store = AppStoreClient::new(&config.stores)?;
    let country = config.fetch.country.as_str();

    println!("\nSearching for \"{term}\"...\n");
    let (play_hits, ios_hits) = search_both(&play, &app_store, term, country).await;

    print!("{}", render_play_results(&play_hits));
    print!("{}", render_app_store_results(&ios_hits, country));
    Ok(())
}

/// Query both stores at once. A store that fails contributes no hits.
pub async fn search_both<A, I>(android: &A, ios: &I, term: &str, country: &str) -> (Vec<AppSummary>, Vec<AppSummary>)
where
    A: AndroidStoreClient + ?Sized,
    I: IosStoreClient + ?Sized,
{
    let (play, app_store) = tokio::join!(
        android.search(term, SEARCH_LIMIT),
        ios.search(term, SEARCH_LIMIT, country)
    );

    let play = play.unwrap_or_else(|e| {
        log::warn!("Google Play search failed: {e}");
        Vec::new()
    });
    let app_store = app_store.unwrap_or_else(|e| {
        log::warn!("App Store search failed: {e}");
        Vec::new()
    });
    (play, app_store)
}

pub fn render_play_results(apps: &[AppSummary]) -> String {
    if apps.is_empty() {
        return String::new();
    }

    let mut out = String::from("=== Google Play ===\n");
    for (i, app) in apps.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, app.title));
        out.push_str(&format!("     ID: {}\n", app.id));
        out.push_str(&format!("     Rating: {} | {}\n\n", app.rating_label(), app.developer));
    }
    out
}

pub fn render_app_store_results(apps: &[AppSummary], country: &str) -> String {
    if apps.is_empty() {
        return String::new();
    }

    let mut out = format!("=== App Store ({}) ===\n", country.to_ascii_uppercase());
    for (i, app) in apps.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, app.title));
        let id_line = match &app.bundle_id {
            Some(bundle) => format!("     ID: {} (bundle: {})\n", app.id, bundle),
            None => format!("     ID: {}\n", app.id),
        };
        out.push_str(&id_line);
        out.push_str(&format!("     Rating: {} | {}\n\n", app.rating_label(), app.developer));
    }
    out
}
