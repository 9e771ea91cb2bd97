//! StorePulse CLI application structure

use anyhow::{Context, Result};

use crate::args::{Args, Command};
use crate::config::{AppConfig, ConfigLoader};
use crate::handlers::fetch::FetchOptions;

/// CLI entry point: owns the parsed arguments and the loaded configuration.
pub struct CliApp {
    args: Args,
    config: AppConfig,
}

impl CliApp {
    pub fn new(args: Args) -> Self {
        Self {
            args,
            config: AppConfig::default(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Load the config file (default location or `--config`) and environment.
    pub fn initialize(&mut self) -> Result<()> {
        let loader = match &self.args.config {
            Some(path) => ConfigLoader::with_path(path.clone()),
            None => ConfigLoader::new(),
        };

        self.config = loader.load_config().context("loading configuration")?;
        log::debug!("Configuration loaded: {:?}", self.config);
        Ok(())
    }

    pub async fn run(&self) -> Result<()> {
        match &self.args.command {
            Command::Search { term } => {
                crate::handlers::search::handle_command(&self.config, &term.join(" ")).await
            }
            Command::Fetch {
                android_app_id,
                ios,
                num,
                rating,
                months,
                platform,
                country,
                output,
            } => {
                let options = FetchOptions {
                    android_app_id: android_app_id.clone(),
                    ios: ios.clone(),
                    num: *num,
                    rating: *rating,
                    months: *months,
                    platform: *platform,
                    country: country.clone(),
                    output: output.clone(),
                };
                crate::handlers::fetch::handle_command(&self.config, &options).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_with_explicit_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[fetch]\nnum = 42\nplatform = \"android\"\n").unwrap();

        let args = Args::try_parse_from([
            "storepulse",
            "--config",
            path.to_str().unwrap(),
            "fetch",
            "com.example.app",
        ])
        .unwrap();
        let mut app = CliApp::new(args);
        app.initialize().unwrap();

        assert_eq!(app.config().fetch.num, 42);
    }

    #[test]
    fn test_initialize_with_missing_explicit_config_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent.toml");

        let args =
            Args::try_parse_from(["storepulse", "--config", path.to_str().unwrap(), "search", "x"]).unwrap();
        let mut app = CliApp::new(args);
        assert!(app.initialize().is_err());
    }
}
