//! Tests for overlays, grouped panels and status plots.

use image::{Rgba, RgbaImage};

use basemap::{StatusGrid, StitchedMap, TileStatus};
use renderer::colormap::{discrete, rainbow, Color, TILE_ALPHA};
use renderer::layout::PANEL_GAP;
use renderer::{
    plot_tile_status, plot_tiles_by_group, plot_tiles_on_map, MapViewport, RenderError,
};
use test_utils::sample_table;
use tile_common::{TileRange, TileTable};

const GREY: Rgba<u8> = Rgba([200, 200, 200, 255]);

/// Plain grey map covering `table` at zoom 14.
fn grey_map(table: &TileTable) -> StitchedMap {
    let range = TileRange::covering(&table.bounding_box().unwrap(), 14).unwrap();
    let grid = range.grid_size();
    let mut statuses = StatusGrid::new(grid);
    for coord in range.tiles() {
        let (row, col) = range.cell(&coord).unwrap();
        statuses.set(row, col, TileStatus::Cached);
    }
    StitchedMap {
        image: RgbaImage::from_pixel(grid.cols * 256, grid.rows * 256, GREY),
        bbox: range.bbox(),
        grid,
        range,
        statuses,
    }
}

/// Pixel at the centre of a record's rectangle.
fn centre(map: &StitchedMap, img: &RgbaImage, table: &TileTable, idx: usize) -> [u8; 4] {
    let viewport = MapViewport::new(map).unwrap();
    let rect = viewport.rect_for(&table.records()[idx].bounds).unwrap();
    let x = rect.left() as u32 + rect.width() / 2;
    let y = rect.top() as u32 + rect.height() / 2;
    img.get_pixel(x, y).0
}

fn blended(fill: Color) -> [u8; 4] {
    let grey = Color::new(GREY[0], GREY[1], GREY[2], 255);
    fill.over(grey, TILE_ALPHA).to_rgba().0
}

fn close(a: [u8; 4], b: [u8; 4]) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| x.abs_diff(*y) <= 2)
}

#[test]
fn test_uniform_blue_without_column() {
    let table = sample_table(3, 2);
    let map = grey_map(&table);

    let img = plot_tiles_on_map(&map, &table, None).unwrap();
    assert_eq!(img.dimensions(), map.image.dimensions());
    assert!(close(centre(&map, &img, &table, 0), blended(Color::BLUE)));
}

#[test]
fn test_rainbow_by_score() {
    let table = sample_table(3, 2);
    let map = grey_map(&table);

    let img = plot_tiles_on_map(&map, &table, Some("score")).unwrap();
    // score runs 0..=5, so first and last tiles hit the ends of the scale
    assert!(close(centre(&map, &img, &table, 0), blended(rainbow(0.0))));
    assert!(close(centre(&map, &img, &table, 5), blended(rainbow(1.0))));
}

#[test]
fn test_class_uses_discrete_palette() {
    let table = sample_table(3, 2);
    let map = grey_map(&table);

    let img = plot_tiles_on_map(&map, &table, Some("class")).unwrap();
    assert!(close(centre(&map, &img, &table, 1), blended(discrete(1.0))));
    assert!(close(centre(&map, &img, &table, 2), blended(discrete(2.0))));
}

#[test]
fn test_tiles_have_dark_edges() {
    let table = sample_table(1, 1);
    let map = grey_map(&table);
    let img = plot_tiles_on_map(&map, &table, None).unwrap();

    let viewport = MapViewport::new(&map).unwrap();
    let rect = viewport.rect_for(&table.records()[0].bounds).unwrap();
    let edge = img.get_pixel(rect.left() as u32, rect.top() as u32 + rect.height() / 2);
    assert!(edge.0[0] < 100, "edge pixel {:?}", edge);
}

#[test]
fn test_unknown_column_and_empty_table() {
    let table = sample_table(2, 2);
    let map = grey_map(&table);

    assert!(matches!(
        plot_tiles_on_map(&map, &table, Some("missing")),
        Err(RenderError::UnknownColumn(_))
    ));
    assert!(matches!(
        plot_tiles_on_map(&map, &TileTable::new(), None),
        Err(RenderError::EmptyTable)
    ));
    assert!(matches!(
        plot_tiles_by_group(&map, &table, "missing"),
        Err(RenderError::UnknownColumn(_))
    ));
}

#[test]
fn test_group_panels_layout() {
    // 3 classes -> 2x2 grid, one blank cell
    let table = sample_table(3, 2);
    let map = grey_map(&table);
    let (w, h) = map.image.dimensions();

    let img = plot_tiles_by_group(&map, &table, "class").unwrap();
    assert_eq!(img.dimensions(), (2 * w + PANEL_GAP, 2 * h + PANEL_GAP));

    // Last cell is blank
    assert_eq!(img.get_pixel(2 * w + PANEL_GAP - 1, 2 * h + PANEL_GAP - 1).0, [255; 4]);
    // Second panel starts with the map background
    assert_eq!(img.get_pixel(w + PANEL_GAP, 0).0, GREY.0);
}

#[test]
fn test_group_panel_shows_only_its_group() {
    let table = sample_table(3, 1); // classes 0, 1, 2
    let map = grey_map(&table);

    let img = plot_tiles_by_group(&map, &table, "class").unwrap();
    // Panel 0 holds class 0: tile 0 coloured, tile 1 untouched.
    assert!(close(centre(&map, &img, &table, 0), blended(discrete(0.0))));
    assert_eq!(centre(&map, &img, &table, 1), GREY.0);
}

#[test]
fn test_status_plot_dimensions() {
    let table = sample_table(3, 2);
    let map = grey_map(&table);

    let img = plot_tile_status(&map);
    let pitch = renderer::status::STATUS_CELL_PX + renderer::status::STATUS_SEPARATOR_PX;
    assert_eq!(
        img.dimensions(),
        (
            map.grid.cols * pitch + renderer::status::STATUS_SEPARATOR_PX,
            map.grid.rows * pitch + renderer::status::STATUS_SEPARATOR_PX
        )
    );
}
