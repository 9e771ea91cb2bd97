//! StorePulse
//!
//! Collects Google Play and App Store reviews, filters them by rating and
//! recency, and writes a single platform-tagged JSON artifact.

pub mod app;
pub mod args;
pub mod clients;
pub mod collector;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod logging;
pub mod progress;
pub mod sink;
pub mod types;

// Re-export commonly used items for convenience
pub use app::CliApp;
pub use collector::{CollectionReport, ReviewCollector};
pub use config::AppConfig;
pub use errors::{AppError, CollectError, StoreError};
pub use types::{FetchRequest, FetchResult, NormalizedReview, Platform};
