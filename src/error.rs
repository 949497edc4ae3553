//! Application-wide error types.
//!
//! Library modules return [`Error`] through the crate [`Result`] alias.
//! The CLI wraps these with `anyhow` for top-level propagation.
//!
//! None of these errors abort a scan: I/O and metadata errors skip the
//! offending entry, persistence errors are reported per directory.

use std::path::PathBuf;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Tag reading error
    #[error("Metadata error for {path}: {message}")]
    Metadata { path: PathBuf, message: String },

    /// The album sink could not store a record
    #[error("Failed to persist album attributes for {path}: {message}")]
    Persistence { path: PathBuf, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a metadata error.
    pub fn metadata(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Metadata {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Create a persistence error.
    pub fn persistence(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Persistence {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
