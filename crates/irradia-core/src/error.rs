//! Error types for irradia-core
//!
//! Unreadable sources are a per-source warning inside the loader, not
//! an error; only a dataset with zero loadable sources fails. A metric
//! with too little data for a comparison is a result
//! (`TestKind::InsufficientData`), never an error.

use thiserror::Error;

/// Main error type for analysis operations
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Every configured source failed to load
    #[error("No data available: none of the configured sources could be loaded")]
    DataUnavailable,

    /// A loaded source lacks required columns
    #[error("Schema of {path} is missing required columns: {}", .missing.join(", "))]
    SchemaInvalid { path: String, missing: Vec<String> },

    /// Metric absent from the merged table
    #[error("Unknown metric: {metric}")]
    UnknownMetric { metric: String },

    /// Group label absent from the merged table
    #[error("Unknown group: {group}")]
    UnknownGroup { group: String },

    /// Export write failure
    #[error("Export failed: {0}")]
    Export(#[from] std::io::Error),

    /// CSV writer error during export
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error during export
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for analysis operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;
