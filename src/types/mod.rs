pub mod app;
pub mod request;
pub mod result;
pub mod review;

pub use app::AppSummary;
pub use request::{FetchRequest, MonthsFilter, PlatformSelector};
pub use result::{FetchResult, FilterSummary, StoreAppIds};
pub use review::{NormalizedReview, Platform, RawReview, SortOrder};
