//! Error types for basemap assembly.

use thiserror::Error;

use storage::StoreError;
use tile_common::{TileCoord, TileError};

/// Errors that abort a fetch or a stitch.
///
/// Remote tile failures are not errors: they surface as
/// [`TileStatus::Failed`](crate::TileStatus::Failed) and only turn fatal
/// when the stitcher later finds the tile missing.
#[derive(Error, Debug)]
pub enum BasemapError {
    /// Tile storage failure (cache directory uncreatable, write error).
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The requested area does not map to a usable tile range.
    #[error(transparent)]
    Tile(#[from] TileError),

    /// A tile needed for stitching is not in the store.
    #[error("tile {coord} is missing from {location}")]
    MissingTile { coord: TileCoord, location: String },

    /// A stored tile could not be decoded as an image.
    #[error("failed to decode tile {coord}: {source}")]
    Decode {
        coord: TileCoord,
        #[source]
        source: image::ImageError,
    },

    /// Stored tiles do not all share the same pixel size.
    #[error("tile {coord} is {actual:?} pixels, expected {expected:?}")]
    TileSizeMismatch {
        coord: TileCoord,
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// Image composition or encoding failure.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// The HTTP client could not be built.
    #[error("failed to create HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// Invalid tile server configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for basemap operations.
pub type BasemapResult<T> = std::result::Result<T, BasemapError>;
