//! Error types for Framecut infrastructure.

use thiserror::Error;

/// Main error type for probing, configuration and I/O.
#[derive(Error, Debug)]
pub enum FramecutError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Probe error: {0}")]
    Probe(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for Framecut operations.
pub type Result<T> = std::result::Result<T, FramecutError>;
