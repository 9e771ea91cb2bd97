use serde::Deserialize;
use std::{collections::HashMap, path::PathBuf};
use crate::errors::ConfigError;
use crate::types::request::{PlatformSelector, MAX_STAR_RATING};

/// Default values for the `fetch` command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Reviews to collect per platform
    pub num: usize,
    /// Highest star rating to keep
    pub rating: u8,
    /// Date window in months, 0 for all time
    pub months: u32,
    pub platform: PlatformSelector,
    pub country: String,
    /// Directory the default `reviews_<app>.json` lands in
    pub output_dir: Option<PathBuf>,
}

/// Partial Fetch Configuration for loading from files
#[derive(Deserialize, Debug, Default)]
pub struct PartialFetchConfig {
    pub num: Option<usize>,
    pub rating: Option<u8>,
    pub months: Option<u32>,
    pub platform: Option<String>,
    pub country: Option<String>,
    pub output_dir: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            num: default_num(),
            rating: MAX_STAR_RATING,
            months: 0,
            platform: PlatformSelector::Both,
            country: default_country(),
            output_dir: None,
        }
    }
}

impl FetchConfig {
    /// Create FetchConfig from environment variables and file config
    pub fn from_env_or_file(
        file_config: Option<PartialFetchConfig>,
        env_map: &HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let partial = file_config.unwrap_or_default();

        let num = match env_map.get("STOREPULSE_NUM") {
            Some(raw) => parse_value("STOREPULSE_NUM", raw)?,
            None => partial.num.unwrap_or_else(default_num),
        };

        let country = env_map
            .get("STOREPULSE_COUNTRY")
            .cloned()
            .or(partial.country)
            .unwrap_or_else(default_country);

        let platform = match partial.platform {
            Some(raw) => raw
                .parse()
                .map_err(|_| invalid("fetch.platform", &raw))?,
            None => PlatformSelector::Both,
        };

        let rating = partial.rating.unwrap_or(MAX_STAR_RATING);
        if !(1..=MAX_STAR_RATING).contains(&rating) {
            return Err(invalid("fetch.rating", &rating.to_string()));
        }

        let output_dir = partial
            .output_dir
            .map(|dir| PathBuf::from(shellexpand::tilde(&dir).as_ref()));

        Ok(Self {
            num,
            rating,
            months: partial.months.unwrap_or(0),
            platform,
            country,
            output_dir,
        })
    }
}

pub(crate) fn parse_value<T: std::str::FromStr>(field: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| invalid(field, raw))
}

pub(crate) fn invalid(field: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    }
}

fn default_num() -> usize {
    500
}

fn default_country() -> String {
    "us".to_string()
}
