//! Error types for Project Meridian.

use thiserror::Error;

/// Top-level error type for Meridian operations.
#[derive(Debug, Error)]
pub enum MeridianError {
    /// Presentation/messaging channel errors
    #[error("Channel error: {0}")]
    Channel(String),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Meridian operations.
pub type MeridianResult<T> = Result<T, MeridianError>;
