use std::path::PathBuf;

use thiserror::Error;

/// Errors from loading theme specifications.
///
/// Resolution itself never fails; see [`resolve`](crate::resolve).
#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("failed to read theme spec {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] toml::de::Error),
}

/// Result type for theme operations
pub type Result<T> = std::result::Result<T, ThemeError>;
