//! Animated time series as looping GIFs.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};
use tracing::{info, instrument};

use basemap::StitchedMap;
use tile_common::TileTable;

use crate::colormap::ColorRule;
use crate::overlay::draw_tiles;
use crate::{MapViewport, RenderError, RenderResult};

/// Display time of one frame.
pub const FRAME_DELAY_MS: u32 = 150;

/// One overlay per column, each coloured with its own normalizer.
///
/// At least one column is required.
pub fn render_frames(
    map: &StitchedMap,
    table: &TileTable,
    columns: &[String],
) -> RenderResult<Vec<RgbaImage>> {
    if table.is_empty() {
        return Err(RenderError::EmptyTable);
    }
    if columns.is_empty() {
        return Err(RenderError::NoFrames);
    }
    let viewport = MapViewport::new(map)?;

    columns
        .iter()
        .map(|column| {
            let rule = ColorRule::for_column(table, Some(column))?;
            Ok(draw_tiles(&map.image, &viewport, table, &rule).0)
        })
        .collect()
}

/// Encode frames as an endlessly looping GIF.
pub fn encode_gif<W: Write>(frames: Vec<RgbaImage>, writer: W) -> RenderResult<()> {
    let mut encoder = GifEncoder::new(writer);
    encoder.set_repeat(Repeat::Infinite)?;
    encoder.encode_frames(frames.into_iter().map(|buffer| {
        Frame::from_parts(buffer, 0, 0, Delay::from_numer_denom_ms(FRAME_DELAY_MS, 1))
    }))?;
    Ok(())
}

/// Animate `columns` over the map and write the GIF to `path`.
#[instrument(skip(map, table, path), fields(path = %path.as_ref().display()))]
pub fn animate(
    map: &StitchedMap,
    table: &TileTable,
    columns: &[String],
    path: impl AsRef<Path>,
) -> RenderResult<()> {
    let path = path.as_ref();
    let frames = render_frames(map, table, columns)?;
    let count = frames.len();

    let file = File::create(path).map_err(|e| RenderError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    encode_gif(frames, &mut writer)?;
    writer.flush().map_err(|e| RenderError::io(path, e))?;

    info!(frames = count, "Wrote animation");
    Ok(())
}
