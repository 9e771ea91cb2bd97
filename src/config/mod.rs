pub mod app_config;
pub mod fetch_config;
pub mod loader;
pub mod store_config;

// Re-export commonly used types
pub use app_config::AppConfig;
pub use fetch_config::FetchConfig;
pub use loader::ConfigLoader;
pub use store_config::StoreConfig;
