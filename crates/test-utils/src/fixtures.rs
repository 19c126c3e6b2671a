//! Common test fixtures for dwell-maps tests.
//!
//! Pre-defined areas, tile tables and heatmap API payloads.

use serde_json::{json, Value};
use tile_common::{BoundingBox, TileRecord, TileTable};

/// Common bounding box definitions for testing.
pub mod bbox {
    use tile_common::BoundingBox;

    /// Zurich city centre, a few tiles wide at zoom 13
    pub const ZURICH: BoundingBox = BoundingBox {
        lon_min: 8.45,
        lon_max: 8.62,
        lat_min: 47.32,
        lat_max: 47.43,
    };

    /// Small area inside a single zoom-10 tile
    pub const ZURICH_SMALL: BoundingBox = BoundingBox {
        lon_min: 8.53,
        lon_max: 8.55,
        lat_min: 47.37,
        lat_max: 47.38,
    };

}

/// Edge length of a sample data tile in degrees.
pub const SAMPLE_TILE_DEG: f64 = 0.01;

/// First tile id of [`sample_table`].
pub const SAMPLE_FIRST_ID: u64 = 44_837_500_026_130;

/// A `cols × rows` block of data tiles starting at (8.50 E, 47.36 N).
///
/// Every record carries a `score` (its index), a `class` (index mod 3) and
/// two hourly columns so the same table works for all plot kinds.
pub fn sample_table(cols: usize, rows: usize) -> TileTable {
    let mut table = TileTable::new();
    for row in 0..rows {
        for col in 0..cols {
            let i = row * cols + col;
            let lon_min = 8.50 + col as f64 * SAMPLE_TILE_DEG;
            let lat_min = 47.36 + row as f64 * SAMPLE_TILE_DEG;
            let bounds = BoundingBox::new(
                lon_min,
                lon_min + SAMPLE_TILE_DEG,
                lat_min,
                lat_min + SAMPLE_TILE_DEG,
            );
            table.push(
                TileRecord::new(SAMPLE_FIRST_ID + i as u64, bounds)
                    .with_value("score", i as f64)
                    .with_value("class", (i % 3) as f64)
                    .with_value("2020-01-27T08:00", i as f64 * 2.0)
                    .with_value("2020-01-27T09:00", (cols * rows - i) as f64),
            );
        }
    }
    table
}

/// `GET /grids/districts/{id}` response for the tiles of [`sample_table`].
pub fn district_grid_json(cols: usize, rows: usize) -> Value {
    let tiles: Vec<Value> = sample_table(cols, rows)
        .iter()
        .map(|r| {
            json!({
                "tileId": r.tile_id,
                "ll": { "x": r.bounds.lon_min, "y": r.bounds.lat_min },
                "ur": { "x": r.bounds.lon_max, "y": r.bounds.lat_max },
            })
        })
        .collect();
    json!({ "tiles": tiles })
}

/// Dwell-density response scoring every tile with `score(tile_id)`.
pub fn dwell_density_json(tile_ids: &[u64], score: impl Fn(u64) -> f64) -> Value {
    let tiles: Vec<Value> = tile_ids
        .iter()
        .map(|&id| json!({ "tileId": id, "score": score(id) }))
        .collect();
    json!({ "tiles": tiles })
}

/// OAuth2 token response.
pub fn token_json(access_token: &str, expires_in: i64) -> Value {
    json!({
        "access_token": access_token,
        "token_type": "Bearer",
        "expires_in": expires_in,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_table_layout() {
        let table = sample_table(3, 2);
        assert_eq!(table.len(), 6);
        assert!(table.has_column("class"));

        let bbox = table.bounding_box().unwrap();
        crate::assert_approx_eq!(bbox.width(), 0.03, 1e-9);
        crate::assert_approx_eq!(bbox.height(), 0.02, 1e-9);
    }

    #[test]
    fn test_district_grid_json_shape() {
        let value = district_grid_json(2, 1);
        let tiles = value["tiles"].as_array().unwrap();
        assert_eq!(tiles.len(), 2);
        assert_eq!(tiles[0]["tileId"], SAMPLE_FIRST_ID);
        crate::assert_approx_eq!(tiles[1]["ll"]["x"].as_f64().unwrap(), 8.51, 1e-9);
    }

    #[test]
    fn test_fixture_boxes_are_valid() {
        for bbox in [bbox::ZURICH, bbox::ZURICH_SMALL] {
            assert!(bbox.validate().is_ok(), "{bbox}");
        }
    }
}
