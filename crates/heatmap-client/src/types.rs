//! API payloads and their conversion to tile tables.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use tile_common::{BoundingBox, TileRecord, TileTable};

/// Timestamp format used in dwell-density URLs and as table column names.
pub const HOUR_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// A corner of a grid tile; `x` is longitude, `y` latitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Corner {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridTile {
    pub tile_id: u64,
    /// Lower-left (south-west) corner
    pub ll: Corner,
    /// Upper-right (north-east) corner
    pub ur: Corner,
}

impl GridTile {
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(self.ll.x, self.ur.x, self.ll.y, self.ur.y)
    }
}

/// Tiles making up one district.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistrictGrid {
    pub tiles: Vec<GridTile>,
}

impl DistrictGrid {
    pub fn tile_ids(&self) -> Vec<u64> {
        self.tiles.iter().map(|t| t.tile_id).collect()
    }

    /// One record per tile, no values yet.
    pub fn to_table(&self) -> TileTable {
        self.tiles
            .iter()
            .map(|t| TileRecord::new(t.tile_id, t.bounds()))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileScore {
    pub tile_id: u64,
    pub score: f64,
}

/// Dwell density of a set of tiles for one hour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DwellDensity {
    /// Start of the hour queried; not part of the response body.
    #[serde(skip, default)]
    pub at: Option<NaiveDateTime>,
    pub tiles: Vec<TileScore>,
}

impl DwellDensity {
    pub fn scores(&self) -> HashMap<u64, f64> {
        self.tiles.iter().map(|t| (t.tile_id, t.score)).collect()
    }

    /// Column name for this hour (`YYYY-MM-DDTHH:MM`), or `score` when the
    /// hour is unknown.
    pub fn column_name(&self) -> String {
        self.at
            .map(|at| at.format(HOUR_FORMAT).to_string())
            .unwrap_or_else(|| "score".to_string())
    }

    /// Write every score into `table` under `column`. Returns how many
    /// scores matched a record; scores of unknown tiles are ignored.
    pub fn apply_to(&self, table: &mut TileTable, column: &str) -> usize {
        self.tiles
            .iter()
            .filter(|t| table.set_value(t.tile_id, column, t.score))
            .count()
    }

    /// Append the tiles of another response for the same hour.
    pub fn merge(&mut self, other: DwellDensity) {
        self.tiles.extend(other.tiles);
    }
}
