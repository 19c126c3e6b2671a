//! Error types for tile geometry.

use thiserror::Error;

/// Result type alias using TileError.
pub type TileResult<T> = Result<T, TileError>;

/// Errors raised by the checked tile and bounding box constructors.
///
/// The raw conversion functions (`degrees_to_tile`, `tile_to_degrees`) never
/// fail; these variants only come out of the validating entry points.
#[derive(Debug, Error, PartialEq)]
pub enum TileError {
    #[error("Latitude {0} is outside the Web Mercator range (±85.0511°)")]
    InvalidLatitude(f64),

    #[error("Longitude {0} is outside [-180, 180]")]
    InvalidLongitude(f64),

    #[error("Zoom level {0} is not supported (max {})", crate::MAX_ZOOM)]
    InvalidZoom(u32),

    #[error("Tile {z}/{x}/{y} is outside the {n}x{n} grid")]
    TileOutOfRange { z: u32, x: u32, y: u32, n: u32 },

    #[error("Invalid bounding box: {0}")]
    InvalidBbox(String),

    #[error("Bounding box {bbox} does not map to a valid tile range at zoom {zoom}: {reason}")]
    InvalidTileRange {
        bbox: String,
        zoom: u32,
        reason: String,
    },
}
