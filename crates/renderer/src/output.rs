//! Writing rendered images.

use std::io::Cursor;
use std::path::Path;

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageOutputFormat, RgbaImage};
use tracing::info;

use crate::{RenderError, RenderResult};

/// Encode as PNG in memory.
pub fn encode_png(img: &RgbaImage) -> RenderResult<Vec<u8>> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(img.clone())
        .write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Png)?;
    Ok(buf)
}

/// Write a PNG file.
pub fn save_png(img: &RgbaImage, path: impl AsRef<Path>) -> RenderResult<()> {
    let path = path.as_ref();
    let bytes = encode_png(img)?;
    std::fs::write(path, &bytes).map_err(|e| RenderError::io(path, e))?;
    info!(path = %path.display(), width = img.width(), height = img.height(), "Wrote image");
    Ok(())
}

/// Resample to `(width, height)` unless already that size.
pub fn resize_to(img: RgbaImage, (width, height): (u32, u32)) -> RgbaImage {
    if img.dimensions() == (width, height) {
        return img;
    }
    imageops::resize(&img, width, height, FilterType::Triangle)
}
