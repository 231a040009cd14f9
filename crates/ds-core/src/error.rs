//! Error types for DemoStat

use thiserror::Error;

/// DemoStat error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Computation error
    #[error("Computation error: {0}")]
    Computation(String),

    /// A required category is absent from one of the paired inputs
    #[error("Missing data: {0}")]
    MissingData(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
