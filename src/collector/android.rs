use crate::clients::{AndroidStoreClient, ANDROID_MAX_PAGE_SIZE};
use crate::errors::CollectError;
use crate::types::{FetchRequest, NormalizedReview, Platform, SortOrder};
use super::window::DateWindow;
use super::{accepts, PlatformHarvest};

/// Page through Play Store reviews newest-first until the target is met, the
/// cursor runs out, the page budget is spent or a page reaches past the window.
pub(crate) async fn harvest<A>(client: &A, request: &FetchRequest, window: DateWindow) -> PlatformHarvest
where
    A: AndroidStoreClient + ?Sized,
{
    let target = request.target_count;
    let page_budget = target.div_ceil(ANDROID_MAX_PAGE_SIZE);
    let mut accepted: Vec<NormalizedReview> = Vec::new();
    let mut cursor: Option<String> = None;

    for page in 0..page_budget {
        if accepted.len() >= target {
            break;
        }

        let page_size = ANDROID_MAX_PAGE_SIZE.min(target - accepted.len());
        let result = client
            .fetch_reviews(&request.android_app_id, page_size, SortOrder::Newest, cursor.as_deref())
            .await;
        let batch = match result {
            Ok(batch) => batch,
            Err(err) => {
                log::debug!("Play Store page {} for {} failed: {}", page + 1, request.android_app_id, err);
                let error = CollectError::source_unavailable(Platform::Android, &err);
                return PlatformHarvest::failed(Platform::Android, accepted, error);
            }
        };

        let before = accepted.len();
        accepted.extend(
            batch
                .items
                .iter()
                .filter(|raw| accepts(raw, request.max_rating, &window))
                .map(|raw| NormalizedReview::from_raw(Platform::Android, raw)),
        );
        log::debug!(
            "Play Store page {}: {} received, {} kept",
            page + 1,
            batch.items.len(),
            accepted.len() - before
        );

        cursor = batch.next_token.filter(|token| !token.is_empty());
        if cursor.is_none() {
            break;
        }

        let oldest = batch.items.last().and_then(|raw| raw.date.as_deref());
        if window.predates(oldest) {
            log::debug!("Play Store page {} reaches past the cutoff, stopping", page + 1);
            break;
        }
    }

    accepted.truncate(target);
    PlatformHarvest::completed(Platform::Android, accepted)
}
