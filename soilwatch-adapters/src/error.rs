//! Error types for adapters.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading exported sensor data or masterlists.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Reading the underlying file or stream failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV layer could not decode a record.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The masterlist is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Input decoded but does not have the expected shape.
    #[error("Failed to parse input: {0}")]
    Parse(String),
}

impl AdapterError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AdapterError::Io {
            path: path.into(),
            source,
        }
    }
}
