use crate::types::review::Platform;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error while {0}: {1}")]
    IO(String, #[source] std::io::Error),
    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors raised by a store back-end while serving a single call.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Store responded with HTTP {status_code} for {url}")]
    Status { status_code: u16, url: String },

    #[error("App not found: {0}")]
    NotFound(String),

    #[error("Response data parsing failed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unexpected response structure from store: {0}")]
    UnexpectedResponse(String),
}

/// Coarse classification shared by every collection failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    SourceUnavailable,
    InvalidConfiguration,
}

#[derive(Debug, Clone, Error)]
pub enum CollectError {
    #[error("{platform} error: {message}")]
    SourceUnavailable { platform: Platform, message: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl CollectError {
    pub fn source_unavailable(platform: Platform, err: &StoreError) -> Self {
        CollectError::SourceUnavailable {
            platform,
            message: err.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CollectError::SourceUnavailable { .. } => ErrorKind::SourceUnavailable,
            CollectError::InvalidConfiguration(_) => ErrorKind::InvalidConfiguration,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            CollectError::SourceUnavailable { message, .. } => message,
            CollectError::InvalidConfiguration(message) => message,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read file '{0}': {1}")]
    FileRead(String, #[source] std::io::Error),
    #[error("Failed to parse TOML from file '{0}': {1}")]
    TomlParse(String, #[source] toml::de::Error),
    #[error("Invalid value for '{field}': {value}")]
    InvalidValue { field: String, value: String },
}

pub fn invalid_configuration<S: Into<String>>(msg: S) -> CollectError {
    CollectError::InvalidConfiguration(msg.into())
}

pub fn io_error<S: Into<String>>(context: S, err: std::io::Error) -> AppError {
    AppError::IO(context.into(), err)
}
