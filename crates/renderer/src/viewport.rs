//! Geographic to pixel projection over a stitched map.

use imageproc::rect::Rect;

use basemap::StitchedMap;
use tile_common::{aspect_ratio, degrees_to_tile_fraction, BoundingBox, GridSize, TileRange};

use crate::{RenderError, RenderResult};

/// Pixel frame of a stitched map.
///
/// Points are projected through fractional Web-Mercator tile coordinates,
/// so overlays line up with the map at any latitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapViewport {
    range: TileRange,
    bbox: BoundingBox,
    grid: GridSize,
    width: u32,
    height: u32,
    tile_width: f64,
    tile_height: f64,
}

impl MapViewport {
    pub fn new(map: &StitchedMap) -> RenderResult<Self> {
        let (width, height) = map.image.dimensions();
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidMap("stitched map has no pixels".into()));
        }
        Ok(Self {
            range: map.range,
            bbox: map.bbox,
            grid: map.grid,
            width,
            height,
            tile_width: width as f64 / map.grid.cols as f64,
            tile_height: height as f64 / map.grid.rows as f64,
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    /// Pixel position `(px, py)` of a point; may fall outside the image.
    pub fn project(&self, lat: f64, lon: f64) -> (f64, f64) {
        let (fx, fy) = degrees_to_tile_fraction(lat, lon, self.range.zoom);
        (
            (fx - self.range.x_min as f64) * self.tile_width,
            (fy - self.range.y_min as f64) * self.tile_height,
        )
    }

    /// Pixel rectangle covering `bounds`, clipped to the image and rounded
    /// to whole pixels. `None` when nothing of it is visible. Visible boxes
    /// are at least one pixel wide.
    pub fn rect_for(&self, bounds: &BoundingBox) -> Option<Rect> {
        let (x0, y0) = self.project(bounds.lat_max, bounds.lon_min);
        let (x1, y1) = self.project(bounds.lat_min, bounds.lon_max);

        let (w, h) = (self.width as f64, self.height as f64);
        if !(x0 < w && y0 < h && x1 > 0.0 && y1 > 0.0) {
            return None;
        }

        let left = x0.max(0.0).round().min(w - 1.0);
        let top = y0.max(0.0).round().min(h - 1.0);
        let right = x1.min(w).round();
        let bottom = y1.min(h).round();

        let rect_w = (right - left).max(1.0) as u32;
        let rect_h = (bottom - top).max(1.0) as u32;
        Some(Rect::at(left as i32, top as i32).of_size(rect_w, rect_h))
    }

    /// Output size for a given width that keeps the map undistorted, from
    /// the map's display aspect ratio.
    pub fn display_size(&self, width: u32) -> (u32, u32) {
        let height = match aspect_ratio(&self.bbox, self.grid.rows, self.grid.cols) {
            Some(aspect) if self.bbox.width() > 0.0 => {
                width as f64 * aspect * self.bbox.height() / self.bbox.width()
            }
            _ => width as f64 * self.height as f64 / self.width as f64,
        };
        (width, height.round().max(1.0) as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use basemap::StatusGrid;
    use image::RgbaImage;
    use test_utils::assert_approx_eq;
    use tile_common::tile_to_degrees;

    fn map() -> StitchedMap {
        let range = TileRange::new(13, 4288, 4292, 2866, 2868).unwrap();
        let grid = range.grid_size();
        StitchedMap {
            image: RgbaImage::new(grid.cols * 256, grid.rows * 256),
            bbox: range.bbox(),
            grid,
            range,
            statuses: StatusGrid::new(grid),
        }
    }

    #[test]
    fn test_project_tile_corners() {
        let viewport = MapViewport::new(&map()).unwrap();

        let (lat, lon) = tile_to_degrees(4288, 2866, 13);
        let (px, py) = viewport.project(lat, lon);
        assert_approx_eq!(px, 0.0, 1e-6);
        assert_approx_eq!(py, 0.0, 1e-6);

        let (lat, lon) = tile_to_degrees(4290, 2867, 13);
        let (px, py) = viewport.project(lat, lon);
        assert_approx_eq!(px, 512.0, 1e-6);
        assert_approx_eq!(py, 256.0, 1e-6);
    }

    #[test]
    fn test_rect_for_tile() {
        let viewport = MapViewport::new(&map()).unwrap();
        let rect = viewport
            .rect_for(&tile_common::tile_bbox(4289, 2867, 13, 1, 1))
            .unwrap();
        assert_eq!((rect.left(), rect.top()), (256, 256));
        assert_eq!((rect.width(), rect.height()), (256, 256));
    }

    #[test]
    fn test_rect_outside_is_none() {
        let viewport = MapViewport::new(&map()).unwrap();
        let far = BoundingBox::new(0.0, 1.0, 10.0, 11.0);
        assert!(viewport.rect_for(&far).is_none());
    }

    #[test]
    fn test_rect_clipped() {
        let viewport = MapViewport::new(&map()).unwrap();
        let bbox = viewport.bbox().to_owned();
        let bigger = BoundingBox::new(
            bbox.lon_min - 1.0,
            bbox.lon_max + 1.0,
            bbox.lat_min - 1.0,
            bbox.lat_max + 1.0,
        );
        let rect = viewport.rect_for(&bigger).unwrap();
        assert_eq!((rect.left(), rect.top()), (0, 0));
        assert_eq!((rect.width(), rect.height()), viewport.dimensions());
    }

    #[test]
    fn test_display_size_keeps_tiles_square() {
        let viewport = MapViewport::new(&map()).unwrap();
        // 5 cols x 3 rows of square tiles
        assert_eq!(viewport.display_size(500), (500, 300));
    }
}
