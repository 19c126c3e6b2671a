//! Error types for tile storage.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by tile stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure (cache directory uncreatable, unreadable file, ...).
    #[error("tile storage I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
