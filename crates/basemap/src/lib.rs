//! Background map assembly from OpenStreetMap tiles.
//!
//! - [`TileFetcher`]: cached-or-download for a single tile, reporting a
//!   [`TileStatus`] instead of failing on network errors
//! - [`build_map`]: stitch every tile covering a bounding box into one image

pub mod config;
pub mod error;
pub mod fetcher;
pub mod source;
pub mod status;
pub mod stitch;

pub use config::TileServerConfig;
pub use error::{BasemapError, BasemapResult};
pub use fetcher::TileFetcher;
pub use source::{HttpTileSource, SourceError, TileSource};
pub use status::{StatusCounts, StatusGrid, TileStatus};
pub use stitch::{build_map, build_map_for_table, StitchedMap};
