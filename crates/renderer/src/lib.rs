//! Raster visualisation of heatmap tiles over stitched basemaps.
//!
//! Implements the plot kinds:
//! - All tiles on one map, coloured by a column
//! - One panel per group value
//! - Tile fetch status grid
//! - Animated time series (GIF)

pub mod animation;
pub mod colormap;
pub mod error;
pub mod layout;
pub mod output;
pub mod overlay;
pub mod status;
pub mod viewport;

pub use animation::{animate, encode_gif, render_frames};
pub use colormap::{Color, ColorRule, Normalizer};
pub use error::{RenderError, RenderResult};
pub use layout::subplot_grid_size;
pub use output::{encode_png, resize_to, save_png};
pub use overlay::{plot_tiles_by_group, plot_tiles_on_map};
pub use status::plot_tile_status;
pub use viewport::MapViewport;
