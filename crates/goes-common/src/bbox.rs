//! Geographic bounding box types and operations.

use serde::{Deserialize, Serialize};

use crate::error::{GoesError, GoesResult};

/// A geographic bounding box in degrees.
///
/// Field order follows the `[west, east, south, north]` extent convention
/// used by map plotting tools. Construction guarantees `west < east` and
/// `south < north`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    west: f64,
    east: f64,
    south: f64,
    north: f64,
}

impl BoundingBox {
    /// Create a new bounding box, validating its orientation.
    pub fn new(west: f64, east: f64, south: f64, north: f64) -> GoesResult<Self> {
        if !(west.is_finite() && east.is_finite() && south.is_finite() && north.is_finite()) {
            return Err(GoesError::InvalidBbox(format!(
                "non-finite extent [{}, {}, {}, {}]",
                west, east, south, north
            )));
        }
        if west >= east {
            return Err(GoesError::InvalidBbox(format!(
                "west ({}) must be less than east ({})",
                west, east
            )));
        }
        if south >= north {
            return Err(GoesError::InvalidBbox(format!(
                "south ({}) must be less than north ({})",
                south, north
            )));
        }
        Ok(Self {
            west,
            east,
            south,
            north,
        })
    }

    /// Parse an extent string: "west,east,south,north"
    pub fn from_extent_str(s: &str) -> GoesResult<Self> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(GoesError::InvalidBbox(format!(
                "{}. Expected 'west,east,south,north'",
                s
            )));
        }

        let mut values = [0.0; 4];
        for (value, part) in values.iter_mut().zip(&parts) {
            *value = part
                .parse()
                .map_err(|_| GoesError::InvalidBbox(format!("invalid number '{}'", part)))?;
        }

        Self::new(values[0], values[1], values[2], values[3])
    }

    pub fn west(&self) -> f64 {
        self.west
    }

    pub fn east(&self) -> f64 {
        self.east
    }

    pub fn south(&self) -> f64 {
        self.south
    }

    pub fn north(&self) -> f64 {
        self.north
    }

    /// Longitude span in degrees.
    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    /// Latitude span in degrees.
    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    /// Check if a point lies inside the box, edges included.
    ///
    /// Longitudes match modulo 360, so a box written across the
    /// antimeridian (`west < -180` or `east > 180`) still contains points
    /// given in [-180, 180]. NaN coordinates are never contained.
    #[inline]
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lat >= self.south
            && lat <= self.north
            && [lon, lon - 360.0, lon + 360.0]
                .iter()
                .any(|&l| l >= self.west && l <= self.east)
    }

    /// Check if `other` lies entirely within this box.
    pub fn contains_box(&self, other: &BoundingBox) -> bool {
        other.west >= self.west
            && other.east <= self.east
            && other.south >= self.south
            && other.north <= self.north
    }

    /// Extent as `[west, east, south, north]`.
    pub fn to_extent(&self) -> [f64; 4] {
        [self.west, self.east, self.south, self.north]
    }
}

impl TryFrom<[f64; 4]> for BoundingBox {
    type Error = GoesError;

    fn try_from(extent: [f64; 4]) -> Result<Self, Self::Error> {
        Self::new(extent[0], extent[1], extent[2], extent[3])
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(bbox: BoundingBox) -> Self {
        bbox.to_extent()
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[W {}, E {}, S {}, N {}]",
            self.west, self.east, self.south, self.north
        )
    }
}
