//! Error handling for the site builder

use std::path::PathBuf;
use thiserror::Error;

/// Build error types
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Report error: {0}")]
    Report(#[from] serde_json::Error),
}

impl BuildError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for build operations
pub type Result<T> = std::result::Result<T, BuildError>;
