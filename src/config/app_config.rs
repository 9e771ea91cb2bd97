use serde::Deserialize;
use std::collections::HashMap;
use crate::errors::ConfigError;

use super::{
    fetch_config::{FetchConfig, PartialFetchConfig},
    store_config::{PartialStoreConfig, StoreConfig},
};

// Configuration location constants
pub const USER_CONFIG_DIR: &str = "storepulse";
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment variables read on top of the config file
pub const ENV_KEYS: [&str; 7] = [
    "STOREPULSE_NUM",
    "STOREPULSE_COUNTRY",
    "STOREPULSE_TIMEOUT_SECS",
    "STOREPULSE_USER_AGENT",
    "STOREPULSE_LANGUAGE",
    "STOREPULSE_PLAY_BASE_URL",
    "STOREPULSE_ITUNES_BASE_URL",
];

/// Main Application Configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub fetch: FetchConfig,
    pub stores: StoreConfig,
}

/// Partial Application Configuration for loading from files
#[derive(Deserialize, Debug, Default)]
pub struct PartialAppConfig {
    fetch: Option<PartialFetchConfig>,
    stores: Option<PartialStoreConfig>,
}

impl AppConfig {
    /// Create AppConfig from partial config and environment
    pub fn from_partial_and_env(
        partial: Option<PartialAppConfig>,
        env_map: HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let partial = partial.unwrap_or_default();

        let fetch = FetchConfig::from_env_or_file(partial.fetch, &env_map)?;
        let stores = StoreConfig::from_env_or_file(partial.stores, &env_map)?;

        Ok(AppConfig { fetch, stores })
    }
}
