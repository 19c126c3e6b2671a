//! Geographic bounding boxes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{TileError, TileResult};

/// A geographic bounding box in WGS84 degrees.
///
/// Field order follows the `(left, right, bottom, top)` convention used for
/// image extents: longitudes first, then latitudes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub lon_min: f64,
    pub lon_max: f64,
    pub lat_min: f64,
    pub lat_max: f64,
}

impl BoundingBox {
    /// Create a bounding box without validating the corner ordering.
    pub fn new(lon_min: f64, lon_max: f64, lat_min: f64, lat_max: f64) -> Self {
        Self {
            lon_min,
            lon_max,
            lat_min,
            lat_max,
        }
    }

    /// Create a bounding box, rejecting empty or inverted extents.
    pub fn try_new(lon_min: f64, lon_max: f64, lat_min: f64, lat_max: f64) -> TileResult<Self> {
        let bbox = Self::new(lon_min, lon_max, lat_min, lat_max);
        bbox.validate()?;
        Ok(bbox)
    }

    /// Check `lon_min < lon_max` and `lat_min < lat_max`.
    pub fn validate(&self) -> TileResult<()> {
        if !(self.lon_min < self.lon_max) {
            return Err(TileError::InvalidBbox(format!(
                "lon_min ({}) must be less than lon_max ({})",
                self.lon_min, self.lon_max
            )));
        }
        if !(self.lat_min < self.lat_max) {
            return Err(TileError::InvalidBbox(format!(
                "lat_min ({}) must be less than lat_max ({})",
                self.lat_min, self.lat_max
            )));
        }
        Ok(())
    }

    /// Longitude span in degrees.
    pub fn width(&self) -> f64 {
        self.lon_max - self.lon_min
    }

    /// Latitude span in degrees.
    pub fn height(&self) -> f64 {
        self.lat_max - self.lat_min
    }

    /// Smallest box containing both `self` and `other`.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            lon_min: self.lon_min.min(other.lon_min),
            lon_max: self.lon_max.max(other.lon_max),
            lat_min: self.lat_min.min(other.lat_min),
            lat_max: self.lat_max.max(other.lat_max),
        }
    }

    /// True when `other` lies entirely inside this box.
    pub fn contains(&self, other: &BoundingBox) -> bool {
        other.lon_min >= self.lon_min
            && other.lon_max <= self.lon_max
            && other.lat_min >= self.lat_min
            && other.lat_max <= self.lat_max
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[lon {:.6}..{:.6}, lat {:.6}..{:.6}]",
            self.lon_min, self.lon_max, self.lat_min, self.lat_max
        )
    }
}

/// Parses `"lon_min,lat_min,lon_max,lat_max"` (the usual BBOX parameter order).
impl FromStr for BoundingBox {
    type Err = TileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(TileError::InvalidBbox(format!(
                "{s}: expected 'lon_min,lat_min,lon_max,lat_max'"
            )));
        }

        let mut values = [0.0f64; 4];
        for (value, part) in values.iter_mut().zip(&parts) {
            *value = part
                .parse()
                .map_err(|_| TileError::InvalidBbox(format!("invalid number '{part}'")))?;
        }

        let [lon_min, lat_min, lon_max, lat_max] = values;
        Self::try_new(lon_min, lon_max, lat_min, lat_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bbox() {
        let bbox: BoundingBox = "8.4,47.3,8.6,47.45".parse().unwrap();
        assert_eq!(bbox.lon_min, 8.4);
        assert_eq!(bbox.lat_min, 47.3);
        assert_eq!(bbox.lon_max, 8.6);
        assert_eq!(bbox.lat_max, 47.45);
    }

    #[test]
    fn test_parse_rejects_inverted() {
        let err = "8.6,47.3,8.4,47.45".parse::<BoundingBox>().unwrap_err();
        assert!(matches!(err, TileError::InvalidBbox(_)));
    }

    #[test]
    fn test_union() {
        let a = BoundingBox::new(0.0, 1.0, 0.0, 1.0);
        let b = BoundingBox::new(0.5, 2.0, -1.0, 0.5);
        assert_eq!(a.union(&b), BoundingBox::new(0.0, 2.0, -1.0, 1.0));
    }
}
