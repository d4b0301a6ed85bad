//! Selection of a fixed-grid window covering a geographic bounding box.
//!
//! The fixed grid is not axis-aligned in lat/lon space, so the selected
//! window is the tightest scan-angle box containing every grid point whose
//! coordinates fall inside the requested box. In geographic terms it usually
//! extends a little beyond the box.

use goes_common::{BoundingBox, GoesError, GoesResult, Grid2D};
use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::geostationary::GeoGrid;
use crate::scan::{GridSlice, ScanGrid};

/// Scan-angle bounds (radians) of a selected region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexWindow {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl IndexWindow {
    /// Whether `other` lies inside this window, edges included.
    pub fn contains(&self, other: &IndexWindow) -> bool {
        other.x_min >= self.x_min
            && other.x_max <= self.x_max
            && other.y_min >= self.y_min
            && other.y_max <= self.y_max
    }

    /// Grow the window to include a scan angle pair.
    #[inline]
    fn include(&mut self, x: f64, y: f64) {
        self.x_min = self.x_min.min(x);
        self.x_max = self.x_max.max(x);
        self.y_min = self.y_min.min(y);
        self.y_max = self.y_max.max(y);
    }

    fn merge(mut self, other: IndexWindow) -> IndexWindow {
        self.include(other.x_min, other.y_min);
        self.include(other.x_max, other.y_max);
        self
    }
}

/// Find the scan-angle window covering every cell whose lat/lon lies in
/// `bbox`.
///
/// # Errors
/// - `ShapeMismatch` if `geo` was not computed for `scan`
/// - `EmptyRegion` if no valid cell falls inside the box
#[instrument(skip(geo, scan), fields(bbox = %bbox))]
pub fn select_window(geo: &GeoGrid, scan: &ScanGrid, bbox: &BoundingBox) -> GoesResult<IndexWindow> {
    if geo.shape() != scan.shape() {
        return Err(GoesError::ShapeMismatch {
            expected: scan.shape(),
            actual: geo.shape(),
        });
    }

    let x = scan.x().values();
    let y = scan.y().values();
    let (rows, _) = scan.shape();

    let window = (0..rows)
        .into_par_iter()
        .filter_map(|row| {
            let lat_row = geo.lat().row(row);
            let lon_row = geo.lon().row(row);
            let mut window: Option<IndexWindow> = None;
            for (col, (&lat, &lon)) in lat_row.iter().zip(lon_row).enumerate() {
                // NaN cells fail every comparison and drop out here
                if bbox.contains(lon, lat) {
                    match window.as_mut() {
                        Some(w) => w.include(x[col], y[row]),
                        None => {
                            window = Some(IndexWindow {
                                x_min: x[col],
                                x_max: x[col],
                                y_min: y[row],
                                y_max: y[row],
                            })
                        }
                    }
                }
            }
            window
        })
        .reduce_with(IndexWindow::merge);

    match window {
        Some(window) => {
            debug!(?window, "Selected scan window");
            Ok(window)
        }
        None => Err(GoesError::EmptyRegion(format!(
            "no valid grid cell inside {}",
            bbox
        ))),
    }
}

/// Convert a window into row/column ranges of `scan`.
///
/// Each axis is resolved on its own, honouring its stored order: on the
/// usual descending `y` axis the rows run from `y_max` down to `y_min`.
pub fn window_slice(scan: &ScanGrid, window: &IndexWindow) -> GoesResult<GridSlice> {
    let slice = GridSlice {
        rows: scan.y().index_range(window.y_min, window.y_max),
        cols: scan.x().index_range(window.x_min, window.x_max),
    };
    if slice.is_empty() {
        return Err(GoesError::EmptyRegion(format!(
            "window {:?} covers no grid cells",
            window
        )));
    }
    Ok(slice)
}

/// Subset a field co-indexed with `scan` to the window.
pub fn apply_window<T: Clone>(
    field: &Grid2D<T>,
    scan: &ScanGrid,
    window: &IndexWindow,
) -> GoesResult<Grid2D<T>> {
    if field.shape() != scan.shape() {
        return Err(GoesError::ShapeMismatch {
            expected: scan.shape(),
            actual: field.shape(),
        });
    }
    let slice = window_slice(scan, window)?;
    Ok(field.subset(slice.rows, slice.cols))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> IndexWindow {
        IndexWindow {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    #[test]
    fn test_window_contains() {
        let outer = window(-0.1, 0.1, -0.1, 0.1);
        assert!(outer.contains(&window(-0.05, 0.05, 0.0, 0.1)));
        assert!(!outer.contains(&window(-0.2, 0.05, 0.0, 0.1)));
    }

    #[test]
    fn test_merge() {
        let merged = window(0.0, 0.1, 0.0, 0.1).merge(window(-0.1, 0.05, 0.05, 0.2));
        assert_eq!(merged, window(-0.1, 0.1, 0.0, 0.2));
    }
}
