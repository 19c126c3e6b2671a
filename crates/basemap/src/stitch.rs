//! Stitching tiles into one background map.

use std::path::Path;

use image::{GenericImage, RgbaImage};
use tracing::{debug, info, instrument};

use storage::TileStore;
use tile_common::{aspect_ratio, BoundingBox, GridSize, TileCoord, TileRange, TileTable};

use crate::{BasemapError, BasemapResult, StatusGrid, TileFetcher, TileSource};

/// A composite raster of a rectangular block of tiles.
#[derive(Debug, Clone)]
pub struct StitchedMap {
    /// Tiles laid out left→right by x and top→bottom by y.
    pub image: RgbaImage,
    /// True extent of the image; may exceed the requested box because whole
    /// tiles are used.
    pub bbox: BoundingBox,
    pub grid: GridSize,
    pub range: TileRange,
    /// Fetch outcome of every tile, for diagnostics.
    pub statuses: StatusGrid,
}

impl StitchedMap {
    /// Pixel size of one tile.
    pub fn tile_size(&self) -> (u32, u32) {
        (
            self.image.width() / self.grid.cols.max(1),
            self.image.height() / self.grid.rows.max(1),
        )
    }

    /// Display aspect ratio for drawing the map over `bbox` in degrees.
    pub fn aspect_ratio(&self) -> Option<f64> {
        aspect_ratio(&self.bbox, self.grid.rows, self.grid.cols)
    }

    /// Write the composite image; the format follows the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> BasemapResult<()> {
        self.image.save(path)?;
        Ok(())
    }
}

/// Build the background map covering `bbox` at `zoom`.
///
/// Every tile of the covering range is fetched (sequentially, x outer and y
/// inner), then read back from the store and placed into the composite. A
/// tile that is not in the store at that point, typically because its fetch
/// failed, aborts the whole operation with [`BasemapError::MissingTile`].
#[instrument(skip(fetcher))]
pub async fn build_map<S, R>(
    fetcher: &TileFetcher<S, R>,
    bbox: &BoundingBox,
    zoom: u32,
) -> BasemapResult<StitchedMap>
where
    S: TileStore,
    R: TileSource,
{
    let range = TileRange::covering(bbox, zoom)?;
    let grid = range.grid_size();

    info!(
        zoom,
        tiles = grid.tile_count(),
        rows = grid.rows,
        cols = grid.cols,
        x_min = range.x_min,
        x_max = range.x_max,
        y_min = range.y_min,
        y_max = range.y_max,
        "Fetching basemap tiles"
    );

    let mut statuses = StatusGrid::new(grid);
    for coord in range.tiles() {
        let status = fetcher.fetch_tile(&coord).await?;
        if let Some((row, col)) = range.cell(&coord) {
            statuses.set(row, col, status);
        }
    }

    let counts = statuses.counts();
    debug!(
        fresh = counts.fresh,
        cached = counts.cached,
        failed = counts.failed,
        "Tiles ready"
    );

    let image = assemble(fetcher.store(), &range).await?;
    debug!(
        width = image.width(),
        height = image.height(),
        "Stitched basemap"
    );

    Ok(StitchedMap {
        image,
        bbox: range.bbox(),
        grid,
        range,
        statuses,
    })
}

/// Build the background map spanning every tile of a data table.
pub async fn build_map_for_table<S, R>(
    fetcher: &TileFetcher<S, R>,
    table: &TileTable,
    zoom: u32,
) -> BasemapResult<StitchedMap>
where
    S: TileStore,
    R: TileSource,
{
    let bbox = table.bounding_box().ok_or_else(|| {
        BasemapError::Config("cannot build a map for an empty tile table".to_string())
    })?;
    build_map(fetcher, &bbox, zoom).await
}

async fn assemble<S: TileStore>(store: &S, range: &TileRange) -> BasemapResult<RgbaImage> {
    let grid = range.grid_size();
    let mut canvas: Option<RgbaImage> = None;

    for coord in range.tiles() {
        let tile = load_tile(store, &coord).await?;
        let (width, height) = tile.dimensions();

        let canvas =
            canvas.get_or_insert_with(|| RgbaImage::new(width * grid.cols, height * grid.rows));
        let expected = (canvas.width() / grid.cols, canvas.height() / grid.rows);
        if (width, height) != expected {
            return Err(BasemapError::TileSizeMismatch {
                coord,
                expected,
                actual: (width, height),
            });
        }

        let col = coord.x - range.x_min;
        let row = coord.y - range.y_min;
        canvas.copy_from(&tile, col * width, row * height)?;
    }

    Ok(canvas.unwrap_or_else(|| RgbaImage::new(0, 0)))
}

async fn load_tile<S: TileStore>(store: &S, coord: &TileCoord) -> BasemapResult<RgbaImage> {
    let data = store
        .get(coord)
        .await?
        .ok_or_else(|| BasemapError::MissingTile {
            coord: *coord,
            location: store.describe(coord),
        })?;

    let tile = image::load_from_memory(&data).map_err(|source| BasemapError::Decode {
        coord: *coord,
        source,
    })?;
    Ok(tile.to_rgba8())
}
