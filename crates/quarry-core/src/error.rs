//! Error types for Quarry

use thiserror::Error;

/// Core error type for Quarry operations
#[derive(Error, Debug)]
pub enum QuarryError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Connection pool is not running")]
    PoolNotRunning,

    #[error("No usable connection after {0} failed validation attempts")]
    AcquisitionExhausted(u32),

    #[error("Cancelled")]
    Cancelled,

    #[error("Connection is closed")]
    ConnectionClosed,

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Result type alias for Quarry operations
pub type Result<T> = std::result::Result<T, QuarryError>;
