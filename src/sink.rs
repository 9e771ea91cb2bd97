//! Persistence of the collection artifact.

use std::fs;
use std::path::PathBuf;

use crate::errors::{io_error, AppError};
use crate::types::FetchResult;

/// Destination for a finished [`FetchResult`].
pub trait ResultSink {
    /// Persist `result` and return where it ended up.
    fn write(&self, result: &FetchResult) -> Result<PathBuf, AppError>;
}

/// Writes the artifact as pretty-printed JSON to a file.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    fn absolute_path(&self) -> Result<PathBuf, AppError> {
        if self.path.is_absolute() {
            return Ok(self.path.clone());
        }
        let cwd = std::env::current_dir()
            .map_err(|e| io_error("resolving the current directory", e))?;
        Ok(cwd.join(&self.path))
    }
}

impl ResultSink for JsonFileSink {
    fn write(&self, result: &FetchResult) -> Result<PathBuf, AppError> {
        let path = self.absolute_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| io_error(format!("creating {}", parent.display()), e))?;
        }

        let json = serde_json::to_string_pretty(result)?;
        fs::write(&path, json).map_err(|e| io_error(format!("writing {}", path.display()), e))?;

        log::debug!("Wrote {} reviews to {}", result.total_fetched(), path.display());
        Ok(path)
    }
}
