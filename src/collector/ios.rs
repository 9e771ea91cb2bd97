use crate::clients::{IosAppRef, IosStoreClient, IOS_PAGE_SIZE};
use crate::errors::CollectError;
use crate::types::{FetchRequest, NormalizedReview, Platform, SortOrder};
use super::window::DateWindow;
use super::{accepts, PlatformHarvest};

/// Page through App Store reviews by page number (1-based) until an empty
/// page, the target, the page budget or a page reaching past the window.
pub(crate) async fn harvest<I>(
    client: &I,
    app: &IosAppRef,
    request: &FetchRequest,
    window: DateWindow,
) -> PlatformHarvest
where
    I: IosStoreClient + ?Sized,
{
    let target = request.target_count;
    let page_budget = u32::try_from(target.div_ceil(IOS_PAGE_SIZE)).unwrap_or(u32::MAX);
    let mut accepted: Vec<NormalizedReview> = Vec::new();

    for page in 1..=page_budget {
        let items = match client
            .fetch_reviews(app, &request.country, SortOrder::Newest, page)
            .await
        {
            Ok(items) => items,
            Err(err) => {
                log::debug!("App Store page {page} for {app} failed: {err}");
                let error = CollectError::source_unavailable(Platform::Ios, &err);
                return PlatformHarvest::failed(Platform::Ios, accepted, error);
            }
        };

        if items.is_empty() {
            log::debug!("App Store page {page} is empty, feed exhausted");
            break;
        }

        let before = accepted.len();
        accepted.extend(
            items
                .iter()
                .filter(|raw| accepts(raw, request.max_rating, &window))
                .map(|raw| NormalizedReview::from_raw(Platform::Ios, raw)),
        );
        log::debug!(
            "App Store page {page}: {} received, {} kept",
            items.len(),
            accepted.len() - before
        );

        if accepted.len() >= target {
            break;
        }

        let oldest = items.last().and_then(|raw| raw.date.as_deref());
        if window.predates(oldest) {
            log::debug!("App Store page {page} reaches past the cutoff, stopping");
            break;
        }
    }

    accepted.truncate(target);
    PlatformHarvest::completed(Platform::Ios, accepted)
}
