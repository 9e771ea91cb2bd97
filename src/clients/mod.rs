pub mod app_store;
pub mod play_store;
pub mod traits;

pub use app_store::AppStoreClient;
pub use play_store::PlayStoreClient;
pub use traits::{
    AndroidReviewPage, AndroidStoreClient, IosAppRef, IosStoreClient, ANDROID_MAX_PAGE_SIZE,
    IOS_PAGE_SIZE,
};
