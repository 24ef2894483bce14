//! Unified error types for Quarry Core.

use thiserror::Error;

/// Main error type for core operations.
///
/// Nothing in this crate is fatal to the process: store and cache
/// failures degrade resolution to a lower-priority source, and listing
/// failures degrade to empty results. These variants exist so the
/// degradation sites have something typed to log and report.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AppError {
    /// Secret store unreachable or its operation failed.
    #[error("Secret store error: {0}")]
    Store(String),

    /// File system I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading or validation failed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unclassified error with message.
    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Result type alias for core operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<String> for AppError {
    fn from(s: String) -> Self {
        AppError::Unknown(s)
    }
}

impl From<&str> for AppError {
    fn from(s: &str) -> Self {
        AppError::Unknown(s.to_string())
    }
}
