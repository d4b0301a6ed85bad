//! Geostationary satellite projection.
//!
//! This projection is used for GOES-R series ABI imagery. The satellite
//! views Earth from a fixed position above the equator, and fixed-grid
//! coordinates are scan angles in radians from nadir:
//! - x: East-West scan angle
//! - y: North-South elevation angle
//!
//! Reference: GOES-R Product Definition and Users' Guide (PUG) Volume 4,
//! Section 4.2.8

use goes_common::{GoesError, GoesResult, Grid2D};
use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::scan::{GridSlice, ScanGrid};

/// Earth and satellite geometry of one dataset.
///
/// Immutable once built; construction rejects non-physical values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorGeometry {
    /// Semi-major (equatorial) axis of the Earth ellipsoid (meters)
    req: f64,
    /// Semi-minor (polar) axis of the Earth ellipsoid (meters)
    rpol: f64,
    /// Longitude of the sub-satellite point (radians)
    lambda_0: f64,
    /// Perspective point height above the ellipsoid (meters)
    perspective_point_height: f64,
}

impl SensorGeometry {
    /// Build a geometry from projection attributes.
    ///
    /// # Arguments
    /// * `semi_major_axis` - Earth equatorial radius (meters)
    /// * `semi_minor_axis` - Earth polar radius (meters)
    /// * `projection_origin_longitude` - Satellite longitude (radians)
    /// * `satellite_height` - Satellite altitude above the ellipsoid (meters)
    pub fn new(
        semi_major_axis: f64,
        semi_minor_axis: f64,
        projection_origin_longitude: f64,
        satellite_height: f64,
    ) -> GoesResult<Self> {
        let values = [
            semi_major_axis,
            semi_minor_axis,
            projection_origin_longitude,
            satellite_height,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(GoesError::InvalidGeometry(format!(
                "non-finite parameter in {:?}",
                values
            )));
        }
        if semi_minor_axis <= 0.0 {
            return Err(GoesError::InvalidGeometry(format!(
                "semi-minor axis must be positive, got {}",
                semi_minor_axis
            )));
        }
        if semi_major_axis < semi_minor_axis {
            return Err(GoesError::InvalidGeometry(format!(
                "semi-major axis {} is smaller than semi-minor axis {}",
                semi_major_axis, semi_minor_axis
            )));
        }
        if satellite_height <= 0.0 {
            return Err(GoesError::InvalidGeometry(format!(
                "satellite height must be positive, got {}",
                satellite_height
            )));
        }

        Ok(Self {
            req: semi_major_axis,
            rpol: semi_minor_axis,
            lambda_0: projection_origin_longitude,
            perspective_point_height: satellite_height,
        })
    }

    /// Same as [`SensorGeometry::new`] with the origin longitude in degrees,
    /// as stored in `goes_imager_projection`.
    pub fn from_degrees(
        semi_major_axis: f64,
        semi_minor_axis: f64,
        longitude_origin_deg: f64,
        satellite_height: f64,
    ) -> GoesResult<Self> {
        Self::new(
            semi_major_axis,
            semi_minor_axis,
            longitude_origin_deg.to_radians(),
            satellite_height,
        )
    }

    /// GRS80 ellipsoid seen from the given sub-satellite longitude (degrees).
    pub fn grs80(longitude_origin_deg: f64) -> Self {
        Self {
            req: 6378137.0,
            rpol: 6356752.31414,
            lambda_0: longitude_origin_deg.to_radians(),
            perspective_point_height: 35786023.0,
        }
    }

    /// GOES-East operational slot (75.2°W).
    pub fn goes_east() -> Self {
        Self::grs80(-75.2)
    }

    /// GOES-West operational slot (137.2°W).
    pub fn goes_west() -> Self {
        Self::grs80(-137.2)
    }

    pub fn semi_major_axis(&self) -> f64 {
        self.req
    }

    pub fn semi_minor_axis(&self) -> f64 {
        self.rpol
    }

    /// Sub-satellite longitude in radians.
    pub fn projection_origin_longitude(&self) -> f64 {
        self.lambda_0
    }

    pub fn satellite_height(&self) -> f64 {
        self.perspective_point_height
    }

    /// Distance from Earth center to the satellite (meters).
    #[inline]
    pub fn h(&self) -> f64 {
        self.req + self.perspective_point_height
    }

    /// Convert one scan angle pair to geographic coordinates.
    ///
    /// Returns `Some((lat, lon))` in degrees, or `None` when the ray misses
    /// the ellipsoid.
    pub fn project(&self, x_rad: f64, y_rad: f64) -> Option<(f64, f64)> {
        self.project_with(x_rad, y_rad, OffDiskPolicy::Invalidate)
    }

    /// [`SensorGeometry::project`] under an explicit off-disk policy.
    pub fn project_with(&self, x_rad: f64, y_rad: f64, policy: OffDiskPolicy) -> Option<(f64, f64)> {
        let (sin_x, cos_x) = x_rad.sin_cos();
        let (sin_y, cos_y) = y_rad.sin_cos();
        self.solve(sin_x, cos_x, sin_y, cos_y, policy)
    }

    /// Ray/ellipsoid intersection from precomputed trigonometry.
    #[inline]
    fn solve(
        &self,
        sin_x: f64,
        cos_x: f64,
        sin_y: f64,
        cos_y: f64,
        policy: OffDiskPolicy,
    ) -> Option<(f64, f64)> {
        let h = self.h();
        let ratio2 = (self.req / self.rpol).powi(2);

        // Quadratic coefficients for the distance to the Earth surface
        let a = sin_x.powi(2) + cos_x.powi(2) * (cos_y.powi(2) + ratio2 * sin_y.powi(2));
        let b = -2.0 * h * cos_x * cos_y;
        let c = h.powi(2) - self.req.powi(2);

        if a.is_nan() || a <= 0.0 {
            return None;
        }

        let discriminant = b * b - 4.0 * a * c;
        let root = match policy {
            OffDiskPolicy::Invalidate if discriminant < 0.0 => return None,
            OffDiskPolicy::Invalidate => discriminant.sqrt(),
            OffDiskPolicy::AbsoluteDiscriminant => discriminant.abs().sqrt(),
        };
        let rs = (-b - root) / (2.0 * a);

        // Satellite-centered coordinates of the surface point
        let sx = rs * cos_x * cos_y;
        let sy = -rs * sin_x;
        let sz = rs * cos_x * sin_y;

        let lat = (ratio2 * sz / ((h - sx).powi(2) + sy.powi(2)).sqrt()).atan();
        let lon = self.lambda_0 - (sy / (h - sx)).atan();

        let (lat, lon) = (lat.to_degrees(), normalize_longitude(lon.to_degrees()));
        if lat.is_finite() && lon.is_finite() {
            Some((lat, lon))
        } else {
            None
        }
    }

    /// Convert geographic coordinates (degrees) to scan angles (radians).
    ///
    /// Returns `None` if the point is beyond the limb as seen from the
    /// satellite.
    pub fn geo_to_scan(&self, lat_deg: f64, lon_deg: f64) -> Option<(f64, f64)> {
        let lat = lat_deg.to_radians();
        let dlon = lon_deg.to_radians() - self.lambda_0;
        let h = self.h();
        let ratio2 = (self.req / self.rpol).powi(2);

        // Geocentric latitude and radius to the surface point
        let phi_c = (lat.tan() / ratio2).atan();
        let e2 = 1.0 - 1.0 / ratio2;
        let rc = self.rpol / (1.0 - e2 * phi_c.cos().powi(2)).sqrt();

        let sx = h - rc * phi_c.cos() * dlon.cos();
        let sy = -rc * phi_c.cos() * dlon.sin();
        let sz = rc * phi_c.sin();

        // Hidden behind the limb
        if h * (h - sx) < sy.powi(2) + ratio2 * sz.powi(2) {
            return None;
        }

        let norm = (sx * sx + sy * sy + sz * sz).sqrt();
        let x = (-sy / norm).asin();
        let y = (sz / sx).atan();
        Some((x, y))
    }
}

/// Treatment of scan angles whose ray does not reach the ellipsoid.
///
/// Off-disk rays produce a negative discriminant in the surface-distance
/// quadratic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OffDiskPolicy {
    /// Mark the cell invalid (NaN latitude and longitude).
    #[default]
    Invalidate,
    /// Take `sqrt(|discriminant|)` and keep the resulting coordinates.
    ///
    /// Matches processing chains that take the absolute value. Off-disk cells carry
    /// finite but physically meaningless coordinates.
    AbsoluteDiscriminant,
}

impl std::str::FromStr for OffDiskPolicy {
    type Err = GoesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "invalidate" | "nan" => Ok(OffDiskPolicy::Invalidate),
            "absolute" | "abs" | "absolute-discriminant" => Ok(OffDiskPolicy::AbsoluteDiscriminant),
            other => Err(GoesError::InvalidFormat(format!(
                "unknown off-disk policy '{}'",
                other
            ))),
        }
    }
}

/// Latitude and longitude (degrees) of every scan grid cell.
///
/// Shape is `(y.len(), x.len())`. Cells without a solution hold NaN in both
/// grids.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoGrid {
    lat: Grid2D<f64>,
    lon: Grid2D<f64>,
}

impl GeoGrid {
    /// Pair latitude and longitude grids of the same shape.
    pub fn new(lat: Grid2D<f64>, lon: Grid2D<f64>) -> GoesResult<Self> {
        lat.ensure_same_shape(&lon)?;
        Ok(Self { lat, lon })
    }

    pub fn lat(&self) -> &Grid2D<f64> {
        &self.lat
    }

    pub fn lon(&self) -> &Grid2D<f64> {
        &self.lon
    }

    pub fn shape(&self) -> (usize, usize) {
        self.lat.shape()
    }

    /// `(lat, lon)` at a cell, NaN included.
    pub fn get(&self, row: usize, col: usize) -> Option<(f64, f64)> {
        Some((*self.lat.get(row, col)?, *self.lon.get(row, col)?))
    }

    /// Number of cells with a valid solution.
    pub fn valid_count(&self) -> usize {
        self.lat
            .as_slice()
            .iter()
            .zip(self.lon.as_slice())
            .filter(|(lat, lon)| !lat.is_nan() && !lon.is_nan())
            .count()
    }

    /// Restrict to a sub-grid.
    pub fn subset(&self, slice: &GridSlice) -> Self {
        Self {
            lat: self.lat.subset(slice.rows.clone(), slice.cols.clone()),
            lon: self.lon.subset(slice.rows.clone(), slice.cols.clone()),
        }
    }
}

/// Compute latitude/longitude for every cell of the scan grid, marking
/// off-disk cells invalid.
pub fn compute_geo_grid(geometry: &SensorGeometry, scan: &ScanGrid) -> GeoGrid {
    compute_geo_grid_with(geometry, scan, OffDiskPolicy::default())
}

/// Compute latitude/longitude for every cell of the scan grid.
///
/// Rows are solved in parallel; each cell depends only on its own scan
/// angles.
#[instrument(skip_all, fields(rows = scan.y().len(), cols = scan.x().len(), ?policy))]
pub fn compute_geo_grid_with(
    geometry: &SensorGeometry,
    scan: &ScanGrid,
    policy: OffDiskPolicy,
) -> GeoGrid {
    let (rows, cols) = scan.shape();

    // Trigonometry per axis value instead of per cell
    let x_trig: Vec<(f64, f64)> = scan.x().values().iter().map(|x| x.sin_cos()).collect();
    let y_trig: Vec<(f64, f64)> = scan.y().values().iter().map(|y| y.sin_cos()).collect();

    let mut lat = Grid2D::filled(rows, cols, f64::NAN);
    let mut lon = Grid2D::filled(rows, cols, f64::NAN);

    lat.as_mut_slice()
        .par_chunks_mut(cols.max(1))
        .zip(lon.as_mut_slice().par_chunks_mut(cols.max(1)))
        .enumerate()
        .for_each(|(row, (lat_row, lon_row))| {
            let (sin_y, cos_y) = y_trig[row];
            for (col, &(sin_x, cos_x)) in x_trig.iter().enumerate() {
                if let Some((la, lo)) = geometry.solve(sin_x, cos_x, sin_y, cos_y, policy) {
                    lat_row[col] = la;
                    lon_row[col] = lo;
                }
            }
        });

    let grid = GeoGrid { lat, lon };
    debug!(valid = grid.valid_count(), total = rows * cols, "Computed geo grid");
    grid
}

/// Wrap a longitude into [-180, 180].
#[inline]
fn normalize_longitude(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) {
        lon
    } else {
        (lon + 180.0).rem_euclid(360.0) - 180.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nadir_goes_east() {
        let geom = SensorGeometry::goes_east();
        let (lat, lon) = geom.project(0.0, 0.0).unwrap();
        assert!(lat.abs() < 1e-9, "Nadir latitude should be 0, got {}", lat);
        assert!((lon - (-75.2)).abs() < 1e-9, "Nadir longitude should be -75.2, got {}", lon);
    }

    #[test]
    fn test_scan_roundtrip() {
        let geom = SensorGeometry::goes_east();

        // Kansas
        let (x, y) = geom.geo_to_scan(38.5, -98.0).unwrap();
        let (lat, lon) = geom.project(x, y).unwrap();
        assert!((lat - 38.5).abs() < 1e-6, "Latitude roundtrip failed: {}", lat);
        assert!((lon - (-98.0)).abs() < 1e-6, "Longitude roundtrip failed: {}", lon);
    }

    #[test]
    fn test_not_visible() {
        let geom = SensorGeometry::goes_east();
        // Opposite side of the Earth
        assert!(geom.geo_to_scan(0.0, 105.0).is_none());
    }

    #[test]
    fn test_off_disk_policies() {
        let geom = SensorGeometry::goes_east();
        // ~0.2 rad is well past the ~0.151 rad limb
        assert!(geom.project(0.2, 0.0).is_none());
        let (lat, lon) = geom
            .project_with(0.2, 0.0, OffDiskPolicy::AbsoluteDiscriminant)
            .unwrap();
        assert!(lat.is_finite() && lon.is_finite());
    }

    #[test]
    fn test_solve_degenerate_quadratic() {
        let geom = SensorGeometry::goes_east();
        for policy in [OffDiskPolicy::Invalidate, OffDiskPolicy::AbsoluteDiscriminant] {
            // a == 0: no division by zero
            assert_eq!(geom.solve(0.0, 0.0, 0.0, 1.0, policy), None);
            assert_eq!(geom.solve(f64::NAN, 1.0, 0.0, 1.0, policy), None);
        }
        // A regular ray still solves
        assert!(geom.solve(0.0, 1.0, 0.0, 1.0, OffDiskPolicy::Invalidate).is_some());
    }

    #[test]
    fn test_normalize_longitude() {
        assert_eq!(normalize_longitude(-75.0), -75.0);
        assert!((normalize_longitude(-200.0) - 160.0).abs() < 1e-12);
        assert!((normalize_longitude(190.0) - (-170.0)).abs() < 1e-12);
    }
}
