//! Error types for source ingestion

use thiserror::Error;

/// Errors that can occur while reading a measurement source
#[derive(Debug, Error)]
pub enum IoError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to open {path}: {source}")]
    OpenFailed {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("No columns in {path}")]
    EmptyTable { path: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for I/O operations
pub type IoResult<T> = Result<T, IoError>;
