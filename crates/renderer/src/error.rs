//! Error types for rendering.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    /// Encoding or composition failure inside the image crate.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No record of the table carries the requested column.
    #[error("column '{0}' not found in tile table")]
    UnknownColumn(String),

    #[error("nothing to draw: tile table is empty")]
    EmptyTable,

    #[error("no columns to animate")]
    NoFrames,

    /// The stitched map has no pixels or no usable extent.
    #[error("invalid map: {0}")]
    InvalidMap(String),
}

impl RenderError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RenderError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type RenderResult<T> = std::result::Result<T, RenderError>;
