use std::{collections::HashMap, env, fs, path::{Path, PathBuf}};
use crate::errors::ConfigError;

use super::app_config::{AppConfig, PartialAppConfig, CONFIG_FILE_NAME, ENV_KEYS, USER_CONFIG_DIR};

/// Configuration loader responsible for loading config from files and environment
pub struct ConfigLoader {
    explicit_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader with default paths
    pub fn new() -> Self {
        Self { explicit_path: None }
    }

    /// Create a config loader reading a specific file
    pub fn with_path(path: PathBuf) -> Self {
        let expanded = shellexpand::tilde(&path.to_string_lossy()).to_string();
        Self { explicit_path: Some(PathBuf::from(expanded)) }
    }

    /// Load complete application configuration
    pub fn load_config(&self) -> Result<AppConfig, ConfigError> {
        let partial_config = match &self.explicit_path {
            Some(path) => Some(self.load_partial_config(path)?),
            None => match self.default_config_path() {
                Some(path) if path.exists() => Some(self.load_partial_config(&path)?),
                Some(path) => {
                    log::debug!("No config file at {}, using defaults", path.display());
                    None
                }
                None => {
                    log::debug!("No user config directory, using defaults");
                    None
                }
            },
        };

        let env_map = self.collect_env_vars();
        AppConfig::from_partial_and_env(partial_config, env_map)
    }

    /// `<config dir>/storepulse/config.toml`
    pub fn default_config_path(&self) -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(USER_CONFIG_DIR).join(CONFIG_FILE_NAME))
    }

    /// Load partial configuration from TOML file
    fn load_partial_config(&self, config_path: &Path) -> Result<PartialAppConfig, ConfigError> {
        let content = fs::read_to_string(config_path).map_err(|e| {
            ConfigError::FileRead(config_path.to_string_lossy().to_string(), e)
        })?;

        let partial_config: PartialAppConfig = toml::from_str(&content).map_err(|e| {
            ConfigError::TomlParse(config_path.to_string_lossy().to_string(), e)
        })?;

        log::debug!("Loaded configuration from {}", config_path.display());
        Ok(partial_config)
    }

    /// Collect relevant environment variables
    fn collect_env_vars(&self) -> HashMap<String, String> {
        let mut env_map = HashMap::new();
        for key in &ENV_KEYS {
            if let Ok(value) = env::var(key) {
                env_map.insert(key.to_string(), value);
            }
        }
        env_map
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
