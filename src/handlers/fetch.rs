//! `fetch` command: collect reviews and write the JSON artifact.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

use crate::clients::{AppStoreClient, PlayStoreClient};
use crate::collector::ReviewCollector;
use crate::config::{AppConfig, FetchConfig};
use crate::errors::CollectError;
use crate::progress::{PassKind, Progress};
use crate::sink::{JsonFileSink, ResultSink};
use crate::types::{FetchRequest, Platform, PlatformSelector};

/// Values given on the command line. `None` falls back to the config.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub android_app_id: String,
    pub ios: Option<String>,
    pub num: Option<usize>,
    pub rating: Option<u8>,
    pub months: Option<u32>,
    pub platform: Option<PlatformSelector>,
    pub country: Option<String>,
    pub output: Option<PathBuf>,
}

impl FetchOptions {
    /// Build the request, command line first, then config.
    pub fn to_request(&self, defaults: &FetchConfig) -> Result<FetchRequest, CollectError> {
        FetchRequest::new(
            &self.android_app_id,
            self.ios.as_deref(),
            self.num.unwrap_or(defaults.num),
            self.rating.unwrap_or(defaults.rating),
            self.months.unwrap_or(defaults.months),
            self.platform.unwrap_or(defaults.platform),
            self.country.as_deref().unwrap_or(&defaults.country),
        )
    }

    /// `--output` as given, else the default name inside the configured
    /// output directory (or the working directory).
    pub fn output_path(&self, defaults: &FetchConfig, request: &FetchRequest) -> PathBuf {
        if let Some(output) = &self.output {
            return output.clone();
        }
        let name = request.default_output_name();
        match &defaults.output_dir {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        }
    }
}

pub async fn handle_command(config: &AppConfig, options: &FetchOptions) -> Result<()> {
    let request = options.to_request(&config.fetch)?;
    log::debug!("Fetch request: {request:?}");

    let play = PlayStoreClient::new(&config.stores).context("building the Google Play client")?;
    let app_store = AppStoreClient::new(&config.stores).context("building the App Store client")?;

    let collector = ReviewCollector::new(Arc::new(play), Arc::new(app_store))
        .with_progress(Arc::new(ConsoleProgress));
    let report = collector.run(&request).await;
    for err in &report.errors {
        log::debug!("Partial results kept after: {err}");
    }

    let sink = JsonFileSink::new(options.output_path(&config.fetch, &request));
    let path = sink.write(&report.result).context("saving the review file")?;

    println!("\nSaved {} reviews to {}", report.result.total_fetched(), path.display());
    Ok(())
}

/// Prints collector progress in the tool's human-readable format.
pub struct ConsoleProgress;

impl ConsoleProgress {
    fn store_name(platform: Platform) -> &'static str {
        match platform {
            Platform::Android => "Google Play",
            Platform::Ios => "App Store",
        }
    }

    /// The parenthesised note after a platform total.
    pub fn filter_note(request: &FetchRequest, pass: PassKind) -> String {
        match pass {
            PassKind::Fallback => "all-time".to_string(),
            PassKind::Requested if request.has_window() => {
                format!("rating <= {}, last {}mo", request.max_rating, request.months)
            }
            PassKind::Requested => format!("rating <= {}", request.max_rating),
        }
    }
}

impl Progress for ConsoleProgress {
    fn platform_started(&self, platform: Platform, app_id: &str, pass: PassKind) {
        if pass == PassKind::Requested {
            println!("\nFetching {} reviews for {app_id}...", Self::store_name(platform));
        }
    }

    fn platform_finished(&self, platform: Platform, accepted: usize, request: &FetchRequest, pass: PassKind) {
        println!(
            "  -> {accepted} {platform} reviews ({})",
            Self::filter_note(request, pass)
        );
    }

    fn platform_failed(&self, error: &CollectError) {
        eprintln!("  {error}");
    }

    fn ios_skipped(&self) {
        println!("\n  Skipping iOS (no --ios flag provided)");
    }

    fn fallback_started(&self, found: usize, months: u32, threshold: usize) {
        println!("\n⚠ Only {found} reviews in last {months} months (minimum: {threshold}).");
        println!("  Expanding to all-time reviews...");
    }

    fn fallback_finished(&self, total: usize) {
        println!("  ✓ Expanded to {total} total reviews.");
    }
}
