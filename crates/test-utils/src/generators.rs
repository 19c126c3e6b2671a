//! Synthetic images and directories for tile tests.
//!
//! Tile bodies are real PNG bytes so they go through the same decode path
//! as downloaded tiles.

use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageOutputFormat, Rgba, RgbaImage};

/// Standard OSM tile edge in pixels.
pub const TILE_PX: u32 = 256;

/// Encodes a single-colour image as PNG.
///
/// # Example
///
/// ```
/// use test_utils::solid_png;
///
/// let png = solid_png(4, 4, [255, 0, 0, 255]);
/// let img = image::load_from_memory(&png).unwrap();
/// assert_eq!(img.width(), 4);
/// ```
pub fn solid_png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    encode_png(RgbaImage::from_pixel(width, height, Rgba(rgba)))
}

/// A distinct opaque colour per tile position.
pub fn tile_color(x: u32, y: u32) -> [u8; 4] {
    [(x % 251) as u8, (y % 251) as u8, ((x + y) % 7 * 30) as u8, 255]
}

pub fn encode_png(img: RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Png)
        .expect("PNG encoding of an in-memory image cannot fail");
    buf
}

/// Temporary cache directory that is removed on drop.
pub fn temp_cache_dir() -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix("tile-cache-")
        .tempdir()
        .expect("failed to create temp dir")
}

/// Number of regular files directly inside `dir`.
pub fn count_files(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .filter(|e| e.path().is_file())
                .count()
        })
        .unwrap_or(0)
}
