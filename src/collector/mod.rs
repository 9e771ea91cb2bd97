//! Review collection: paginates both stores, applies the rating and date
//! filters, and falls back to an all-time pass when a windowed run is thin.

mod android;
mod ios;
pub mod window;

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::clients::{AndroidStoreClient, IosAppRef, IosStoreClient};
use crate::errors::CollectError;
use crate::progress::{NullProgress, PassKind, Progress};
use crate::types::{FetchRequest, FetchResult, NormalizedReview, Platform, RawReview};
pub use window::DateWindow;

/// A windowed run with fewer reviews than this is redone without the window.
pub const MIN_WINDOWED_REVIEWS: usize = 30;

/// Reviews gathered from one store in one pass, plus the error that cut the
/// loop short, if any. Reviews accepted before the error are kept.
#[derive(Debug)]
pub struct PlatformHarvest {
    pub platform: Platform,
    pub reviews: Vec<NormalizedReview>,
    pub error: Option<CollectError>,
}

impl PlatformHarvest {
    pub(crate) fn completed(platform: Platform, reviews: Vec<NormalizedReview>) -> Self {
        Self { platform, reviews, error: None }
    }

    pub(crate) fn failed(platform: Platform, reviews: Vec<NormalizedReview>, error: CollectError) -> Self {
        Self { platform, reviews, error: Some(error) }
    }
}

/// Result of one pass over the selected stores. `None` means the store was
/// not queried.
#[derive(Debug, Default)]
pub struct PassOutcome {
    pub android: Option<PlatformHarvest>,
    pub ios: Option<PlatformHarvest>,
}

impl PassOutcome {
    pub fn total(&self) -> usize {
        self.harvests().map(|h| h.reviews.len()).sum()
    }

    pub fn errors(&self) -> impl Iterator<Item = &CollectError> {
        self.harvests().filter_map(|h| h.error.as_ref())
    }

    fn harvests(&self) -> impl Iterator<Item = &PlatformHarvest> {
        self.android.iter().chain(self.ios.iter())
    }

    /// Android reviews first, then iOS.
    pub fn into_reviews(self) -> Vec<NormalizedReview> {
        self.android
            .into_iter()
            .chain(self.ios)
            .flat_map(|h| h.reviews)
            .collect()
    }
}

/// Everything a run produced: the artifact plus what happened along the way.
#[derive(Debug)]
pub struct CollectionReport {
    pub result: FetchResult,
    /// Store errors from the pass whose reviews ended up in `result`.
    pub errors: Vec<CollectError>,
    pub fallback_used: bool,
}

/// Drives both store clients for a [`FetchRequest`].
pub struct ReviewCollector<A: ?Sized, I: ?Sized> {
    android: Arc<A>,
    ios: Arc<I>,
    progress: Arc<dyn Progress>,
}

impl<A, I> ReviewCollector<A, I>
where
    A: AndroidStoreClient + ?Sized,
    I: IosStoreClient + ?Sized,
{
    pub fn new(android: Arc<A>, ios: Arc<I>) -> Self {
        Self {
            android,
            ios,
            progress: Arc::new(NullProgress),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn Progress>) -> Self {
        self.progress = progress;
        self
    }

    /// Collect reviews for `request`. Store failures never fail the run;
    /// they are logged and whatever was gathered is returned.
    pub async fn collect(&self, request: &FetchRequest) -> FetchResult {
        self.run_at(request, Utc::now()).await.result
    }

    /// [`collect`](Self::collect) with an explicit clock, used for the date
    /// window cutoff and the fetch timestamp.
    pub async fn collect_at(&self, request: &FetchRequest, now: DateTime<Utc>) -> FetchResult {
        self.run_at(request, now).await.result
    }

    pub async fn run(&self, request: &FetchRequest) -> CollectionReport {
        self.run_at(request, Utc::now()).await
    }

    pub async fn run_at(&self, request: &FetchRequest, now: DateTime<Utc>) -> CollectionReport {
        let window = DateWindow::last_months(request.months, now);
        let mut outcome = self.run_pass(request, window, PassKind::Requested).await;
        let mut fallback_used = false;

        if window.is_active() && outcome.total() < MIN_WINDOWED_REVIEWS {
            log::info!(
                "Only {} reviews in the last {} months, refetching without a date window",
                outcome.total(),
                request.months
            );
            self.progress
                .fallback_started(outcome.total(), request.months, MIN_WINDOWED_REVIEWS);
            outcome = self
                .run_pass(request, DateWindow::unbounded(), PassKind::Fallback)
                .await;
            self.progress.fallback_finished(outcome.total());
            fallback_used = true;
        }

        let errors = outcome.errors().cloned().collect();

        CollectionReport {
            result: FetchResult::new(request, now, outcome.into_reviews()),
            errors,
            fallback_used,
        }
    }

    /// One pass over the selected stores, both loops running concurrently.
    pub async fn run_pass(&self, request: &FetchRequest, window: DateWindow, pass: PassKind) -> PassOutcome {
        let android = async {
            if !request.wants_android() {
                return None;
            }
            self.progress
                .platform_started(Platform::Android, &request.android_app_id, pass);
            let harvest = android::harvest(self.android.as_ref(), request, window).await;
            Some(self.report(harvest, request, pass))
        };

        let ios = async {
            let app_id = match (&request.ios_app_id, request.wants_ios()) {
                (Some(app_id), true) => app_id,
                _ => {
                    if pass == PassKind::Requested && request.platform.includes(Platform::Ios) {
                        log::info!("No App Store id supplied, skipping iOS");
                        self.progress.ios_skipped();
                    }
                    return None;
                }
            };
            self.progress.platform_started(Platform::Ios, app_id, pass);
            let app = IosAppRef::parse(app_id);
            let harvest = ios::harvest(self.ios.as_ref(), &app, request, window).await;
            Some(self.report(harvest, request, pass))
        };

        let (android, ios) = tokio::join!(android, ios);
        PassOutcome { android, ios }
    }

    fn report(&self, harvest: PlatformHarvest, request: &FetchRequest, pass: PassKind) -> PlatformHarvest {
        if let Some(err) = &harvest.error {
            log::warn!("{err}");
            self.progress.platform_failed(err);
        }
        log::info!("{}: {} reviews accepted", harvest.platform, harvest.reviews.len());
        self.progress
            .platform_finished(harvest.platform, harvest.reviews.len(), request, pass);
        harvest
    }
}

/// Rating and date filter shared by both platform loops.
pub(crate) fn accepts(raw: &RawReview, max_rating: u8, window: &DateWindow) -> bool {
    raw.score <= max_rating && window.admits(raw.date.as_deref())
}
