//! Common types and tile geometry shared across the dwell-maps crates.

pub mod bbox;
pub mod error;
pub mod records;
pub mod tile;

pub use bbox::BoundingBox;
pub use error::{TileError, TileResult};
pub use records::{TileRecord, TileTable};
pub use tile::{
    aspect_ratio, degrees_to_tile, degrees_to_tile_fraction, tile_bbox, tile_to_degrees, GridSize,
    TileCoord, TileRange, MAX_LATITUDE, MAX_ZOOM,
};
