//! Web Mercator (slippy map) tile geometry.
//!
//! Tiles are addressed by `(z, x, y)`: `x` grows eastward from 180°W and `y`
//! grows southward from ~85.05°N, with `2^z` tiles per side.

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{BoundingBox, TileError, TileResult};

/// Latitude limit of the Web Mercator projection, `atan(sinh(π))` in degrees.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Highest zoom level accepted by the checked constructors.
pub const MAX_ZOOM: u32 = 22;

/// A tile coordinate (z/x/y).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    /// Zoom level
    pub z: u32,
    /// Column (x)
    pub x: u32,
    /// Row (y)
    pub y: u32,
}

impl TileCoord {
    pub fn new(z: u32, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }

    /// Create a tile coordinate, checking `0 <= x, y < 2^z`.
    pub fn try_new(z: u32, x: u32, y: u32) -> TileResult<Self> {
        if z > MAX_ZOOM {
            return Err(TileError::InvalidZoom(z));
        }
        let n = 1u32 << z;
        if x >= n || y >= n {
            return Err(TileError::TileOutOfRange { z, x, y, n });
        }
        Ok(Self { z, x, y })
    }

    /// Tile containing a geographic point, with input validation.
    ///
    /// Points exactly on the east or south edge of the world are clamped
    /// into the last column/row.
    pub fn from_degrees(lat: f64, lon: f64, z: u32) -> TileResult<Self> {
        if z > MAX_ZOOM {
            return Err(TileError::InvalidZoom(z));
        }
        if !(-MAX_LATITUDE..=MAX_LATITUDE).contains(&lat) {
            return Err(TileError::InvalidLatitude(lat));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(TileError::InvalidLongitude(lon));
        }

        let last = (1i64 << z) - 1;
        let (x, y) = degrees_to_tile(lat, lon, z);
        Ok(Self {
            z,
            x: x.clamp(0, last) as u32,
            y: y.clamp(0, last) as u32,
        })
    }

    /// Storage key string, `z/x/y`.
    pub fn cache_key(&self) -> String {
        format!("{}/{}/{}", self.z, self.x, self.y)
    }

    /// Geographic bounds of this single tile.
    pub fn bbox(&self) -> BoundingBox {
        tile_bbox(self.x, self.y, self.z, 1, 1)
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

/// Fractional tile position of a point. The integer part is the tile index,
/// the fractional part the position inside that tile.
pub fn degrees_to_tile_fraction(lat: f64, lon: f64, zoom: u32) -> (f64, f64) {
    let n = 2f64.powi(zoom as i32);
    let x = (lon + 180.0) / 360.0 * n;
    let y = (1.0 - lat.to_radians().tan().asinh() / PI) / 2.0 * n;
    (x, y)
}

/// Convert lat/lon to Web Mercator tile indices.
///
/// No bounds checking: latitudes at or beyond ±85.05° give indices outside
/// `0..2^zoom` (possibly negative). Use [`TileCoord::from_degrees`] when the
/// input is not known to be in range.
pub fn degrees_to_tile(lat: f64, lon: f64, zoom: u32) -> (i64, i64) {
    let (x, y) = degrees_to_tile_fraction(lat, lon, zoom);
    (x.floor() as i64, y.floor() as i64)
}

/// North-west corner `(lat, lon)` of tile `(x, y)` at `zoom`.
///
/// `x == 2^zoom` / `y == 2^zoom` are accepted and give the east/south edge of
/// the world.
pub fn tile_to_degrees(x: u32, y: u32, zoom: u32) -> (f64, f64) {
    let n = 2f64.powi(zoom as i32);
    let lon = x as f64 / n * 360.0 - 180.0;
    let lat = (PI * (1.0 - 2.0 * y as f64 / n)).sinh().atan().to_degrees();
    (lat, lon)
}

/// Bounding box of a block of `width_tiles` x `height_tiles` tiles whose
/// top-left tile is `(x, y)`.
pub fn tile_bbox(x: u32, y: u32, zoom: u32, width_tiles: u32, height_tiles: u32) -> BoundingBox {
    let (lat_max, lon_min) = tile_to_degrees(x, y, zoom);
    let (lat_min, lon_max) = tile_to_degrees(x + width_tiles, y + height_tiles, zoom);
    BoundingBox::new(lon_min, lon_max, lat_min, lat_max)
}

/// Display aspect ratio (height of one degree of latitude relative to one
/// degree of longitude) that shows a stitched grid without distortion.
///
/// Returns `None` for a zero-height bbox or an empty grid.
pub fn aspect_ratio(bbox: &BoundingBox, grid_rows: u32, grid_cols: u32) -> Option<f64> {
    let height = bbox.height();
    if height == 0.0 || grid_cols == 0 {
        return None;
    }
    Some((bbox.width() / height) * (grid_rows as f64 / grid_cols as f64))
}

/// Dimensions of a tile grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub rows: u32,
    pub cols: u32,
}

impl GridSize {
    pub fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols }
    }

    pub fn tile_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Inclusive rectangular block of tiles at one zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRange {
    pub zoom: u32,
    pub x_min: u32,
    pub x_max: u32,
    pub y_min: u32,
    pub y_max: u32,
}

impl TileRange {
    /// Create a range, checking ordering and grid bounds.
    pub fn new(zoom: u32, x_min: u32, x_max: u32, y_min: u32, y_max: u32) -> TileResult<Self> {
        TileCoord::try_new(zoom, x_min, y_min)?;
        TileCoord::try_new(zoom, x_max, y_max)?;
        if x_min > x_max || y_min > y_max {
            return Err(TileError::InvalidTileRange {
                bbox: format!("x {x_min}..{x_max}, y {y_min}..{y_max}"),
                zoom,
                reason: "min index exceeds max index".to_string(),
            });
        }
        Ok(Self {
            zoom,
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }

    /// Smallest tile range covering `bbox` at `zoom`.
    ///
    /// The south-west corner gives `(x_min, y_max)` and the north-east corner
    /// `(x_max, y_min)`, since tile rows grow southward. A box that projects
    /// outside the tile grid or to an inverted range is rejected.
    pub fn covering(bbox: &BoundingBox, zoom: u32) -> TileResult<Self> {
        if zoom > MAX_ZOOM {
            return Err(TileError::InvalidZoom(zoom));
        }
        bbox.validate()?;

        let (x_min, y_max) = degrees_to_tile(bbox.lat_min, bbox.lon_min, zoom);
        let (x_max, y_min) = degrees_to_tile(bbox.lat_max, bbox.lon_max, zoom);

        let invalid = |reason: String| TileError::InvalidTileRange {
            bbox: bbox.to_string(),
            zoom,
            reason,
        };

        let n = 1i64 << zoom;
        for (name, value) in [
            ("x_min", x_min),
            ("x_max", x_max),
            ("y_min", y_min),
            ("y_max", y_max),
        ] {
            if !(0..n).contains(&value) {
                return Err(invalid(format!("{name}={value} is outside 0..{n}")));
            }
        }
        if x_min > x_max {
            return Err(invalid(format!("x_min={x_min} > x_max={x_max}")));
        }
        if y_min > y_max {
            return Err(invalid(format!("y_min={y_min} > y_max={y_max}")));
        }

        Ok(Self {
            zoom,
            x_min: x_min as u32,
            x_max: x_max as u32,
            y_min: y_min as u32,
            y_max: y_max as u32,
        })
    }

    /// Grid dimensions: rows span y, columns span x.
    pub fn grid_size(&self) -> GridSize {
        GridSize {
            rows: self.y_max - self.y_min + 1,
            cols: self.x_max - self.x_min + 1,
        }
    }

    pub fn tile_count(&self) -> usize {
        self.grid_size().tile_count()
    }

    /// All tiles of the range, column by column (x outer, y inner).
    pub fn tiles(&self) -> impl Iterator<Item = TileCoord> {
        let Self {
            zoom,
            x_min,
            x_max,
            y_min,
            y_max,
        } = *self;
        (x_min..=x_max).flat_map(move |x| (y_min..=y_max).map(move |y| TileCoord::new(zoom, x, y)))
    }

    pub fn contains(&self, coord: &TileCoord) -> bool {
        coord.z == self.zoom
            && (self.x_min..=self.x_max).contains(&coord.x)
            && (self.y_min..=self.y_max).contains(&coord.y)
    }

    /// `(row, col)` of a tile inside the grid.
    pub fn cell(&self, coord: &TileCoord) -> Option<(usize, usize)> {
        if !self.contains(coord) {
            return None;
        }
        Some((
            (coord.y - self.y_min) as usize,
            (coord.x - self.x_min) as usize,
        ))
    }

    /// True geographic extent of the whole block of tiles.
    pub fn bbox(&self) -> BoundingBox {
        let grid = self.grid_size();
        tile_bbox(self.x_min, self.y_min, self.zoom, grid.cols, grid.rows)
    }
}

impl fmt::Display for TileRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "z{} x {}..={} y {}..={}",
            self.zoom, self.x_min, self.x_max, self.y_min, self.y_max
        )
    }
}
