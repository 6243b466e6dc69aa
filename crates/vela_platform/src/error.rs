//! Platform error types

use thiserror::Error;

/// Platform-related errors
#[derive(Error, Debug)]
pub enum PlatformError {
    /// The host cannot report window metrics yet (no window laid out)
    #[error("Window metrics unavailable: {0}")]
    MetricsUnavailable(String),

    /// The host reported dimensions that are not positive and finite
    #[error("Invalid window dimensions: {width}x{height}")]
    InvalidDimensions { width: f32, height: f32 },

    /// Platform not available
    #[error("Platform not available: {0}")]
    Unavailable(String),

    /// Generic platform error
    #[error("Platform error: {0}")]
    Other(String),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;
