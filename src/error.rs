//! Error types for the review-compare library.
//!
//! Record-level defects (bad ratings, duplicate bodies, unparseable dates) are
//! never errors; they are dropped or nulled and counted in stage summaries.
//! The variants here cover systemic failures: unreadable reference data,
//! unwritable outputs, broken configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in the review-compare pipeline.
#[derive(Error, Debug)]
pub enum ReviewCompareError {
    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The product reference table could not be read at all
    #[error("Cannot read product table {path}: {reason}")]
    ProductTable { path: PathBuf, reason: String },

    /// An input source was missing or unreadable
    #[error("Cannot read input {path}: {reason}")]
    InputUnreadable { path: PathBuf, reason: String },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid user input (paths, identifiers)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// General error with context
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Result with ReviewCompareError
pub type Result<T> = std::result::Result<T, ReviewCompareError>;

impl From<anyhow::Error> for ReviewCompareError {
    fn from(err: anyhow::Error) -> Self {
        ReviewCompareError::Other(err.to_string())
    }
}

impl From<config::ConfigError> for ReviewCompareError {
    fn from(err: config::ConfigError) -> Self {
        ReviewCompareError::InvalidConfig(err.to_string())
    }
}
