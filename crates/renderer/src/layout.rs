//! Panel grids for grouped plots.

use image::{GenericImage, RgbaImage};

use crate::colormap::Color;
use crate::RenderResult;

/// Gap between panels in pixels.
pub const PANEL_GAP: u32 = 8;

/// `(rows, cols)` for `n` panels: `(⌊√n⌋, ⌊√n⌋ + 1)`, with rows added
/// until every panel fits.
pub fn subplot_grid_size(n: usize) -> (usize, usize) {
    let diag = (n as f64).sqrt().floor() as usize;
    let cols = diag + 1;
    let mut rows = diag.max(1);
    while rows * cols < n {
        rows += 1;
    }
    (rows, cols)
}

/// Tile equally sized panels row by row into one image. Cells beyond the
/// last panel stay `background`.
pub fn compose_grid(
    panels: &[RgbaImage],
    rows: usize,
    cols: usize,
    gap: u32,
    background: Color,
) -> RenderResult<RgbaImage> {
    let (panel_w, panel_h) = panels.first().map(|p| p.dimensions()).unwrap_or((0, 0));
    let (rows, cols) = (rows as u32, cols as u32);

    let width = cols * panel_w + cols.saturating_sub(1) * gap;
    let height = rows * panel_h + rows.saturating_sub(1) * gap;
    let mut canvas = RgbaImage::from_pixel(width, height, background.to_rgba());

    for (i, panel) in panels.iter().enumerate().take((rows * cols) as usize) {
        let row = i as u32 / cols;
        let col = i as u32 % cols;
        canvas.copy_from(panel, col * (panel_w + gap), row * (panel_h + gap))?;
    }

    Ok(canvas)
}
