//! Dwell-density heatmaps over OpenStreetMap.
//!
//! Fetches district tile grids and hourly dwell density from the Swisscom
//! Heatmaps API, stitches the OSM background map covering them, and renders
//! overlays, grouped panels, a tile status grid or an animation.

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDateTime;
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use basemap::TileServerConfig;
use heatmap_client::HOUR_FORMAT;

#[derive(Parser, Debug)]
#[command(name = "dwell-maps")]
#[command(about = "Swisscom dwell-density heatmaps over OpenStreetMap tiles")]
struct Args {
    /// Log level
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Log as JSON lines
    #[arg(long, global = true)]
    json: bool,

    /// Tile server URL with {z}, {x} and {y} placeholders
    #[arg(long, global = true, env = "TILE_URL_TEMPLATE")]
    tile_url: Option<String>,

    /// Directory for cached map tiles
    #[arg(long, global = true, env = "TILE_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch the tile grid of a district
    District {
        district: u32,

        /// Write the tiles as JSON instead of logging a summary
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Fetch hourly dwell density for every tile of a district
    Density {
        district: u32,

        #[command(flatten)]
        hours: HourRange,

        /// Write the table as JSON
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Stitch the background map covering a district
    Basemap {
        district: u32,

        #[command(flatten)]
        map: MapOutput,
    },

    /// Plot dwell density of a district over its background map
    Plot {
        district: u32,

        #[command(flatten)]
        hours: HourRange,

        #[command(flatten)]
        map: MapOutput,

        /// Column used for tile colours (default: first hour)
        #[arg(long)]
        color_by: Option<String>,

        /// Also write one panel per value of this column
        #[arg(long)]
        group_by: Option<String>,

        /// Path of the grouped-panel image
        #[arg(long, requires = "group_by")]
        groups_out: Option<PathBuf>,

        /// Write an animation over all hours (GIF)
        #[arg(long)]
        animate: Option<PathBuf>,
    },

    /// Stitch the background map of an arbitrary bounding box
    Bbox {
        #[arg(long, allow_hyphen_values = true)]
        lon_min: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon_max: f64,
        #[arg(long, allow_hyphen_values = true)]
        lat_min: f64,
        #[arg(long, allow_hyphen_values = true)]
        lat_max: f64,

        #[command(flatten)]
        map: MapOutput,
    },
}

/// Consecutive hours starting at `at`.
#[derive(ClapArgs, Debug, Clone)]
struct HourRange {
    /// First hour, YYYY-MM-DDTHH:MM
    #[arg(long, value_parser = parse_hour)]
    at: NaiveDateTime,

    /// Number of hours
    #[arg(long, default_value = "1")]
    hours: u32,
}

#[derive(ClapArgs, Debug, Clone)]
struct MapOutput {
    /// Tile zoom level
    #[arg(long, default_value = "15")]
    zoom: u32,

    /// Output image (PNG)
    #[arg(long)]
    out: PathBuf,

    /// Also write the tile status grid (PNG)
    #[arg(long)]
    status: Option<PathBuf>,

    /// Resize outputs to this width, keeping the map's aspect ratio
    #[arg(long)]
    width: Option<u32>,
}

fn parse_hour(s: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s, HOUR_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|e| format!("expected YYYY-MM-DDTHH:MM: {e}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);
    if args.json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    let mut tiles = TileServerConfig::from_env();
    if let Some(url) = &args.tile_url {
        tiles.url_template = url.clone();
    }
    if let Some(dir) = &args.cache_dir {
        tiles.cache_dir = dir.clone();
    }
    info!(
        tile_url = %tiles.url_template,
        cache_dir = %tiles.cache_dir.display(),
        "Starting dwell-maps"
    );

    match args.command {
        Command::District { district, out } => commands::district(district, out).await,
        Command::Density {
            district,
            hours,
            out,
        } => commands::density(district, &hours, out).await,
        Command::Basemap { district, map } => commands::basemap(&tiles, district, &map).await,
        Command::Plot {
            district,
            hours,
            map,
            color_by,
            group_by,
            groups_out,
            animate,
        } => {
            let plot = commands::PlotOptions {
                color_by,
                group_by,
                groups_out,
                animate,
            };
            commands::plot(&tiles, district, &hours, &map, plot).await
        }
        Command::Bbox {
            lon_min,
            lon_max,
            lat_min,
            lat_max,
            map,
        } => {
            let bbox = tile_common::BoundingBox::new(lon_min, lon_max, lat_min, lat_max);
            commands::bbox(&tiles, &bbox, &map).await
        }
    }
}
