//! Common error types for VGC

use thiserror::Error;

/// Common result type for VGC operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across VGC crates
#[derive(Error, Debug)]
pub enum Error {
    /// Content provider call failed (network or API error)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Operator declined a high-quota operation
    #[error("Operation cancelled: quota charge declined by operator")]
    QuotaDeclined,

    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True when the failure came from the operator declining a quota
    /// confirmation, so callers can short-circuit instead of reporting a
    /// provider fault.
    pub fn is_quota_declined(&self) -> bool {
        matches!(self, Error::QuotaDeclined)
    }
}
