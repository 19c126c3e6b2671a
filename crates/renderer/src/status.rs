//! Diagnostic image of tile fetch outcomes.

use image::RgbaImage;
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use basemap::{StatusGrid, StitchedMap};

use crate::colormap::{status_color, Color};

/// Edge of one status cell in pixels.
pub const STATUS_CELL_PX: u32 = 24;
/// Width of the white lines between cells.
pub const STATUS_SEPARATOR_PX: u32 = 3;
/// Cell opacity over the white background.
const STATUS_ALPHA: f32 = 0.7;

/// One cell per tile of the map, laid out like the map itself:
/// failed dark purple, cached teal, fresh yellow.
pub fn plot_tile_status(map: &StitchedMap) -> RgbaImage {
    render_status_grid(&map.statuses, STATUS_CELL_PX)
}

/// Render a status grid with `cell_px` cells separated by white lines.
/// Cells without a status stay white.
pub fn render_status_grid(statuses: &StatusGrid, cell_px: u32) -> RgbaImage {
    let size = statuses.size();
    let pitch = cell_px + STATUS_SEPARATOR_PX;
    let width = size.cols * pitch + STATUS_SEPARATOR_PX;
    let height = size.rows * pitch + STATUS_SEPARATOR_PX;

    let mut img = RgbaImage::from_pixel(width, height, Color::WHITE.to_rgba());
    if cell_px == 0 {
        return img;
    }

    for (row, col, status) in statuses.iter() {
        let fill = status_color(status).over(Color::WHITE, STATUS_ALPHA);
        let x = STATUS_SEPARATOR_PX + col as u32 * pitch;
        let y = STATUS_SEPARATOR_PX + row as u32 * pitch;
        draw_filled_rect_mut(
            &mut img,
            Rect::at(x as i32, y as i32).of_size(cell_px, cell_px),
            fill.to_rgba(),
        );
    }
    img
}
