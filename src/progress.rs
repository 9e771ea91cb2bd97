//! Lightweight progress reporting for a collection run.
//! Frontends implement this to surface status to users; both platform loops
//! report through the same shared reference, so methods take `&self`.

use crate::errors::CollectError;
use crate::types::{FetchRequest, Platform};

/// Which pass a platform result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    /// First pass, honouring the requested date window (if any).
    Requested,
    /// All-time re-fetch after the windowed pass came up short.
    Fallback,
}

pub trait Progress: Send + Sync {
    /// A platform loop is about to issue its first request.
    fn platform_started(&self, _platform: Platform, _app_id: &str, _pass: PassKind) {}

    /// A platform loop finished with `accepted` reviews.
    fn platform_finished(&self, _platform: Platform, _accepted: usize, _request: &FetchRequest, _pass: PassKind) {}

    /// A platform loop stopped on a store error.
    fn platform_failed(&self, _error: &CollectError) {}

    /// ios was selected but no App Store id was supplied.
    fn ios_skipped(&self) {}

    /// The windowed pass found too few reviews; an all-time pass follows.
    fn fallback_started(&self, _found: usize, _months: u32, _threshold: usize) {}

    /// The all-time pass is done.
    fn fallback_finished(&self, _total: usize) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
