use serde::Deserialize;
use std::{collections::HashMap, time::Duration};
use crate::errors::ConfigError;
use super::fetch_config::parse_value;

/// Connection settings for the two store back-ends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub play_base_url: String,
    pub itunes_base_url: String,
    pub user_agent: String,
    /// `hl` parameter sent to Google Play
    pub language: String,
    /// `gl` parameter sent to Google Play
    pub play_country: String,
    pub timeout_secs: u64,
}

/// Partial Store Configuration for loading from files
#[derive(Deserialize, Debug, Default)]
pub struct PartialStoreConfig {
    pub play_base_url: Option<String>,
    pub itunes_base_url: Option<String>,
    pub user_agent: Option<String>,
    pub language: Option<String>,
    pub play_country: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            play_base_url: default_play_base_url(),
            itunes_base_url: default_itunes_base_url(),
            user_agent: default_user_agent(),
            language: default_language(),
            play_country: default_play_country(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl StoreConfig {
    /// Create StoreConfig from environment variables and file config
    pub fn from_env_or_file(
        file_config: Option<PartialStoreConfig>,
        env_map: &HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let partial = file_config.unwrap_or_default();

        let play_base_url = env_map
            .get("STOREPULSE_PLAY_BASE_URL")
            .cloned()
            .or(partial.play_base_url)
            .unwrap_or_else(default_play_base_url);

        let itunes_base_url = env_map
            .get("STOREPULSE_ITUNES_BASE_URL")
            .cloned()
            .or(partial.itunes_base_url)
            .unwrap_or_else(default_itunes_base_url);

        let user_agent = env_map
            .get("STOREPULSE_USER_AGENT")
            .cloned()
            .or(partial.user_agent)
            .unwrap_or_else(default_user_agent);

        let language = env_map
            .get("STOREPULSE_LANGUAGE")
            .cloned()
            .or(partial.language)
            .unwrap_or_else(default_language);

        let timeout_secs = match env_map.get("STOREPULSE_TIMEOUT_SECS") {
            Some(raw) => parse_value("STOREPULSE_TIMEOUT_SECS", raw)?,
            None => partial.timeout_secs.unwrap_or_else(default_timeout_secs),
        };

        Ok(Self {
            play_base_url: play_base_url.trim_end_matches('/').to_string(),
            itunes_base_url: itunes_base_url.trim_end_matches('/').to_string(),
            user_agent,
            language,
            play_country: partial.play_country.unwrap_or_else(default_play_country),
            timeout_secs,
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Settings pointing both stores at one local server.
    pub fn for_base_url(base_url: &str) -> Self {
        Self {
            play_base_url: base_url.trim_end_matches('/').to_string(),
            itunes_base_url: base_url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }
}

fn default_play_base_url() -> String {
    "https://play.google.com".to_string()
}

fn default_itunes_base_url() -> String {
    "https://itunes.apple.com".to_string()
}

fn default_user_agent() -> String {
    format!("storepulse/{}", env!("CARGO_PKG_VERSION"))
}

fn default_language() -> String {
    "en".to_string()
}

fn default_play_country() -> String {
    "us".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}
