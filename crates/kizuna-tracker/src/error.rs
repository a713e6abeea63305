//! Error types for the tracker

use thiserror::Error;

/// Result type alias for tracker operations
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Errors that stop a run
///
/// Classifier failures are not here: they degrade a single record and are
/// reported through [`crate::ClassifierError`] instead.
#[derive(Error, Debug)]
pub enum TrackerError {
    /// The input dataset lacks a required column
    #[error("Missing column in episode dataset: {0}")]
    MissingColumn(String),

    /// CSV reading or writing failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
