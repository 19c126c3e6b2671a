//! Subcommand implementations.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{Duration, NaiveDateTime};
use image::RgbaImage;
use tracing::{info, warn};

use basemap::{build_map, build_map_for_table, StitchedMap, TileFetcher, TileServerConfig};
use heatmap_client::{HeatmapApiConfig, HeatmapClient};
use renderer::{
    animate, plot_tile_status, plot_tiles_by_group, plot_tiles_on_map, resize_to, save_png,
    MapViewport,
};
use tile_common::{BoundingBox, TileTable};

use crate::{HourRange, MapOutput};

/// Optional outputs of the `plot` command.
pub struct PlotOptions {
    pub color_by: Option<String>,
    pub group_by: Option<String>,
    pub groups_out: Option<PathBuf>,
    pub animate: Option<PathBuf>,
}

async fn connect() -> Result<HeatmapClient> {
    let config = HeatmapApiConfig::from_env().context("Heatmap API credentials")?;
    HeatmapClient::connect(config)
        .await
        .context("Failed to authenticate with the Heatmaps API")
}

async fn district_table(client: &HeatmapClient, district: u32) -> Result<TileTable> {
    let grid = client
        .tile_ids_for_district(district)
        .await
        .with_context(|| format!("Failed to fetch tiles of district {district}"))?;
    if grid.tiles.is_empty() {
        bail!("district {district} has no tiles");
    }
    Ok(grid.to_table())
}

/// District tiles with one dwell-density column per hour. Returns the
/// table and its hour columns in order.
async fn density_table(
    client: &HeatmapClient,
    district: u32,
    hours: &HourRange,
) -> Result<(TileTable, Vec<String>)> {
    if hours.hours == 0 {
        bail!("--hours must be at least 1");
    }

    let mut table = district_table(client, district).await?;
    let ids = table.tile_ids();
    let mut columns = Vec::with_capacity(hours.hours as usize);

    for offset in 0..hours.hours {
        let at: NaiveDateTime = hours.at + Duration::hours(offset as i64);
        let density = client
            .dwell_density_batched(at, &ids)
            .await
            .with_context(|| format!("Failed to fetch dwell density for {at}"))?;

        let column = density.column_name();
        let matched = density.apply_to(&mut table, &column);
        if matched < ids.len() {
            warn!(column = %column, matched, tiles = ids.len(), "Some tiles have no score");
        } else {
            info!(column = %column, matched, "Loaded dwell density");
        }
        columns.push(column);
    }

    Ok((table, columns))
}

fn write_json(table: &TileTable, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, table)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), records = table.len(), "Wrote tile table");
    Ok(())
}

fn log_table(table: &TileTable) {
    let bbox = table.bounding_box();
    info!(
        records = table.len(),
        columns = ?table.columns(),
        bbox = ?bbox.map(|b| b.to_string()),
        "Tile table"
    );
}

/// Save an image rendered over `map`. With `--width` the map part is
/// resized to that width at its display aspect ratio; composites of several
/// panels scale alike.
fn write_map_image(
    map: &StitchedMap,
    img: RgbaImage,
    output: &MapOutput,
    path: &Path,
) -> Result<()> {
    let img = match output.width {
        Some(width) => {
            let (w, h) = MapViewport::new(map)?.display_size(width);
            let sx = w as f64 / map.image.width() as f64;
            let sy = h as f64 / map.image.height() as f64;
            let target = (
                ((img.width() as f64 * sx).round() as u32).max(1),
                ((img.height() as f64 * sy).round() as u32).max(1),
            );
            resize_to(img, target)
        }
        None => img,
    };
    save_png(&img, path).with_context(|| format!("Failed to save {}", path.display()))
}

fn write_status(map: &StitchedMap, output: &MapOutput) -> Result<()> {
    if let Some(path) = &output.status {
        save_png(&plot_tile_status(map), path)
            .with_context(|| format!("Failed to save {}", path.display()))?;
    }
    Ok(())
}

pub async fn district(district: u32, out: Option<PathBuf>) -> Result<()> {
    let client = connect().await?;
    let table = district_table(&client, district).await?;
    match out {
        Some(path) => write_json(&table, &path),
        None => {
            log_table(&table);
            Ok(())
        }
    }
}

pub async fn density(district: u32, hours: &HourRange, out: Option<PathBuf>) -> Result<()> {
    let client = connect().await?;
    let (table, columns) = density_table(&client, district, hours).await?;
    for column in &columns {
        info!(column = %column, range = ?table.column_range(column), "Dwell density");
    }
    match out {
        Some(path) => write_json(&table, &path),
        None => {
            log_table(&table);
            Ok(())
        }
    }
}

pub async fn basemap(tiles: &TileServerConfig, district: u32, output: &MapOutput) -> Result<()> {
    let client = connect().await?;
    let table = district_table(&client, district).await?;

    let fetcher = TileFetcher::from_config(tiles)?;
    let map = build_map_for_table(&fetcher, &table, output.zoom)
        .await
        .context("Failed to build background map")?;

    write_status(&map, output)?;
    write_map_image(&map, map.image.clone(), output, &output.out)
}

pub async fn plot(
    tiles: &TileServerConfig,
    district: u32,
    hours: &HourRange,
    output: &MapOutput,
    options: PlotOptions,
) -> Result<()> {
    let client = connect().await?;
    let (table, columns) = density_table(&client, district, hours).await?;

    let fetcher = TileFetcher::from_config(tiles)?;
    let map = build_map_for_table(&fetcher, &table, output.zoom)
        .await
        .context("Failed to build background map")?;
    write_status(&map, output)?;

    let color_by = options
        .color_by
        .as_deref()
        .or(columns.first().map(String::as_str));
    let overlay = plot_tiles_on_map(&map, &table, color_by).context("Failed to draw tiles")?;
    write_map_image(&map, overlay, output, &output.out)?;

    if let Some(group_by) = &options.group_by {
        let panels = plot_tiles_by_group(&map, &table, group_by)
            .with_context(|| format!("Failed to draw groups of '{group_by}'"))?;
        let path = options
            .groups_out
            .clone()
            .unwrap_or_else(|| sibling(&output.out, "groups"));
        write_map_image(&map, panels, output, &path)?;
    }

    if let Some(path) = &options.animate {
        animate(&map, &table, &columns, path)
            .with_context(|| format!("Failed to write animation {}", path.display()))?;
    }

    Ok(())
}

pub async fn bbox(tiles: &TileServerConfig, bbox: &BoundingBox, output: &MapOutput) -> Result<()> {
    bbox.validate().context("Invalid bounding box")?;

    let fetcher = TileFetcher::from_config(tiles)?;
    let map = build_map(&fetcher, bbox, output.zoom)
        .await
        .context("Failed to build background map")?;

    write_status(&map, output)?;
    write_map_image(&map, map.image.clone(), output, &output.out)
}

/// `map.png` + `groups` -> `map-groups.png`
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "map".to_string());
    path.with_file_name(format!("{stem}-{suffix}.png"))
}
