//! Data tiles drawn as translucent rectangles over a basemap.

use image::RgbaImage;
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, Blend};
use tracing::{debug, instrument};

use basemap::StitchedMap;
use tile_common::TileTable;

use crate::colormap::{discrete, Color, ColorRule, TILE_ALPHA};
use crate::layout::{compose_grid, subplot_grid_size, PANEL_GAP};
use crate::{MapViewport, RenderError, RenderResult};

/// Draw every record of `table` onto a copy of `base`.
///
/// Fill is the rule's colour at [`TILE_ALPHA`]; edges are black. Records
/// without a colour (missing value) or outside the map are skipped.
/// Returns how many records were drawn.
pub fn draw_tiles(
    base: &RgbaImage,
    viewport: &MapViewport,
    table: &TileTable,
    rule: &ColorRule,
) -> (RgbaImage, usize) {
    let mut canvas = Blend(base.clone());
    let edge = Color::BLACK.with_alpha(TILE_ALPHA).to_rgba();
    let mut drawn = 0;

    for record in table {
        let Some(fill) = rule.color_for(record) else {
            continue;
        };
        let Some(rect) = viewport.rect_for(&record.bounds) else {
            continue;
        };
        draw_filled_rect_mut(&mut canvas, rect, fill.with_alpha(TILE_ALPHA).to_rgba());
        draw_hollow_rect_mut(&mut canvas, rect, edge);
        drawn += 1;
    }

    (canvas.0, drawn)
}

/// All tiles on one map, coloured by `color_column` (see
/// [`ColorRule::for_column`]).
#[instrument(skip(map, table), fields(records = table.len()))]
pub fn plot_tiles_on_map(
    map: &StitchedMap,
    table: &TileTable,
    color_column: Option<&str>,
) -> RenderResult<RgbaImage> {
    if table.is_empty() {
        return Err(RenderError::EmptyTable);
    }
    let viewport = MapViewport::new(map)?;
    let rule = ColorRule::for_column(table, color_column)?;

    let (image, drawn) = draw_tiles(&map.image, &viewport, table, &rule);
    debug!(drawn, "Drew data tiles");
    Ok(image)
}

/// One panel per distinct value of `group_column`, in ascending order,
/// each showing only that group's tiles in its discrete colour. Panels are
/// laid out by [`subplot_grid_size`]; surplus cells are left blank.
#[instrument(skip(map, table), fields(records = table.len()))]
pub fn plot_tiles_by_group(
    map: &StitchedMap,
    table: &TileTable,
    group_column: &str,
) -> RenderResult<RgbaImage> {
    if table.is_empty() {
        return Err(RenderError::EmptyTable);
    }
    let groups = table.group_by(group_column);
    if groups.is_empty() {
        return Err(RenderError::UnknownColumn(group_column.to_string()));
    }
    let viewport = MapViewport::new(map)?;

    let panels: Vec<RgbaImage> = groups
        .iter()
        .map(|(value, group)| {
            let rule = ColorRule::Uniform(discrete(*value));
            draw_tiles(&map.image, &viewport, group, &rule).0
        })
        .collect();

    let (rows, cols) = subplot_grid_size(panels.len());
    debug!(groups = panels.len(), rows, cols, "Composing group panels");
    compose_grid(&panels, rows, cols, PANEL_GAP, Color::WHITE)
}
