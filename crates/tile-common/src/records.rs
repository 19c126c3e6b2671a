//! Typed data-tile records.
//!
//! A [`TileTable`] holds one [`TileRecord`] per heatmap tile: its id, its
//! geographic bounds and any number of named numeric values ("columns"),
//! e.g. one dwell-density score per hour or a cluster label.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::BoundingBox;

/// One heatmap data tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileRecord {
    pub tile_id: u64,
    pub bounds: BoundingBox,
    #[serde(default)]
    pub values: BTreeMap<String, f64>,
}

impl TileRecord {
    pub fn new(tile_id: u64, bounds: BoundingBox) -> Self {
        Self {
            tile_id,
            bounds,
            values: BTreeMap::new(),
        }
    }

    /// Builder-style setter for a named value.
    pub fn with_value(mut self, column: impl Into<String>, value: f64) -> Self {
        self.values.insert(column.into(), value);
        self
    }

    pub fn value(&self, column: &str) -> Option<f64> {
        self.values.get(column).copied()
    }
}

/// An ordered collection of data tiles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TileTable {
    records: Vec<TileRecord>,
}

impl TileTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<TileRecord>) -> Self {
        Self { records }
    }

    pub fn push(&mut self, record: TileRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[TileRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &TileRecord> {
        self.records.iter()
    }

    pub fn tile_ids(&self) -> Vec<u64> {
        self.records.iter().map(|r| r.tile_id).collect()
    }

    pub fn get(&self, tile_id: u64) -> Option<&TileRecord> {
        self.records.iter().find(|r| r.tile_id == tile_id)
    }

    /// Set `column` on the record with `tile_id`. Returns false when no
    /// such tile exists.
    pub fn set_value(&mut self, tile_id: u64, column: &str, value: f64) -> bool {
        match self.records.iter_mut().find(|r| r.tile_id == tile_id) {
            Some(record) => {
                record.values.insert(column.to_string(), value);
                true
            }
            None => false,
        }
    }

    /// Union of all column names present in any record.
    pub fn columns(&self) -> BTreeSet<String> {
        self.records
            .iter()
            .flat_map(|r| r.values.keys().cloned())
            .collect()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.records.iter().any(|r| r.values.contains_key(column))
    }

    /// Extent covering every record: min of the lower-left corners, max of
    /// the upper-right corners.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let mut iter = self.records.iter();
        let first = iter.next()?.bounds;
        Some(iter.fold(first, |acc, r| acc.union(&r.bounds)))
    }

    /// `(min, max)` of a column over the records that carry it.
    pub fn column_range(&self, column: &str) -> Option<(f64, f64)> {
        self.records
            .iter()
            .filter_map(|r| r.value(column))
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    pub fn column_max(&self, column: &str) -> Option<f64> {
        self.column_range(column).map(|(_, hi)| hi)
    }

    /// Split the table by the distinct values of `column`, in ascending
    /// order. Records without the column are left out.
    pub fn group_by(&self, column: &str) -> Vec<(f64, TileTable)> {
        let mut groups: Vec<(f64, TileTable)> = Vec::new();
        for record in &self.records {
            let Some(key) = record.value(column) else {
                continue;
            };
            match groups.iter_mut().find(|(k, _)| k.total_cmp(&key).is_eq()) {
                Some((_, table)) => table.push(record.clone()),
                None => groups.push((key, TileTable::from_records(vec![record.clone()]))),
            }
        }
        groups.sort_by(|a, b| a.0.total_cmp(&b.0));
        groups
    }
}

impl FromIterator<TileRecord> for TileTable {
    fn from_iter<I: IntoIterator<Item = TileRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a TileTable {
    type Item = &'a TileRecord;
    type IntoIter = std::slice::Iter<'a, TileRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TileTable {
        TileTable::from_records(vec![
            TileRecord::new(1, BoundingBox::new(8.50, 8.51, 47.30, 47.31))
                .with_value("class", 1.0)
                .with_value("score", 4.0),
            TileRecord::new(2, BoundingBox::new(8.51, 8.52, 47.31, 47.32))
                .with_value("class", 0.0)
                .with_value("score", 10.0),
            TileRecord::new(3, BoundingBox::new(8.52, 8.53, 47.29, 47.30)).with_value("class", 1.0),
        ])
    }

    #[test]
    fn test_bounding_box() {
        let bbox = sample().bounding_box().unwrap();
        assert_eq!(bbox, BoundingBox::new(8.50, 8.53, 47.29, 47.32));
        assert!(TileTable::new().bounding_box().is_none());
    }

    #[test]
    fn test_column_range_skips_missing() {
        let table = sample();
        assert_eq!(table.column_range("score"), Some((4.0, 10.0)));
        assert_eq!(table.column_max("class"), Some(1.0));
        assert_eq!(table.column_range("missing"), None);
    }

    #[test]
    fn test_group_by_sorted() {
        let groups = sample().group_by("class");
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, 0.0);
        assert_eq!(groups[0].1.tile_ids(), vec![2]);
        assert_eq!(groups[1].1.tile_ids(), vec![1, 3]);
    }

    #[test]
    fn test_set_value() {
        let mut table = sample();
        assert!(table.set_value(3, "score", 7.0));
        assert!(!table.set_value(99, "score", 7.0));
        assert_eq!(table.get(3).unwrap().value("score"), Some(7.0));
    }

    #[test]
    fn test_json_shape() {
        let table = TileTable::from_records(vec![
            TileRecord::new(7, BoundingBox::new(8.5, 8.6, 47.0, 47.1)).with_value("score", 2.5)
        ]);
        let value = serde_json::to_value(&table).unwrap();
        assert_eq!(value["records"][0]["tile_id"], 7);
        assert_eq!(value["records"][0]["values"]["score"], 2.5);

        // Records without values deserialize with an empty map.
        let back: TileTable = serde_json::from_str(
            r#"{"records":[{"tile_id":7,"bounds":{"lon_min":8.5,"lon_max":8.6,"lat_min":47.0,"lat_max":47.1}}]}"#,
        )
        .unwrap();
        assert!(back.records()[0].values.is_empty());
    }
}
