//! Client for the Swisscom Heatmaps API.
//!
//! Authenticates with OAuth2 client credentials, then queries district tile
//! grids and hourly dwell density. Responses convert into
//! [`tile_common::TileTable`]s for plotting.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use auth::AccessToken;
pub use client::{HeatmapClient, MAX_TILES_PER_REQUEST};
pub use config::HeatmapApiConfig;
pub use error::{HeatmapError, HeatmapResult};
pub use types::{Corner, DistrictGrid, DwellDensity, GridTile, TileScore, HOUR_FORMAT};
