//! Fixed-grid scan angle axes.
//!
//! ABI files store `x` west-to-east (ascending) and `y` north-to-south
//! (descending). The order of each axis is detected when the axis is built
//! and every index lookup honours it, so no caller has to assume a
//! convention.

use std::ops::Range;

use goes_common::{GoesError, GoesResult};

/// Direction in which an axis' values run with increasing index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOrder {
    Ascending,
    Descending,
}

/// One strictly monotonic axis of scan angles (radians).
///
/// Besides the values the axis keeps half the sample spacing at each end,
/// so a subset down to a single value still knows the footprint of its cell.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanAxis {
    values: Vec<f64>,
    order: AxisOrder,
    half_first: f64,
    half_last: f64,
}

impl ScanAxis {
    /// Build an axis, rejecting empty, non-finite or non-monotonic values.
    ///
    /// A single-value axis counts as ascending.
    pub fn new(name: &str, values: Vec<f64>) -> GoesResult<Self> {
        if values.is_empty() {
            return Err(GoesError::InvalidScanGrid(format!("{} axis is empty", name)));
        }
        if let Some(bad) = values.iter().position(|v| !v.is_finite()) {
            return Err(GoesError::InvalidScanGrid(format!(
                "{} axis has non-finite value at index {}",
                name, bad
            )));
        }

        let order = if values.len() < 2 || values[1] > values[0] {
            AxisOrder::Ascending
        } else {
            AxisOrder::Descending
        };

        let monotonic = values.windows(2).all(|w| match order {
            AxisOrder::Ascending => w[1] > w[0],
            AxisOrder::Descending => w[1] < w[0],
        });
        if !monotonic {
            return Err(GoesError::InvalidScanGrid(format!(
                "{} axis is not strictly monotonic",
                name
            )));
        }

        let n = values.len();
        let (half_first, half_last) = if n < 2 {
            (0.0, 0.0)
        } else {
            (
                (values[1] - values[0]).abs() / 2.0,
                (values[n - 1] - values[n - 2]).abs() / 2.0,
            )
        };

        Ok(Self {
            values,
            order,
            half_first,
            half_last,
        })
    }

    /// Unpack an axis stored as scaled integers (`raw * scale + offset`).
    pub fn from_packed(name: &str, raw: &[i16], scale: f64, offset: f64) -> GoesResult<Self> {
        let values = raw.iter().map(|&v| v as f64 * scale + offset).collect();
        Self::new(name, values)
    }

    /// Evenly spaced axis of `n` values starting at `start`.
    pub fn regular(name: &str, start: f64, step: f64, n: usize) -> GoesResult<Self> {
        let mut axis = Self::new(name, (0..n).map(|i| start + i as f64 * step).collect())?;
        axis.half_first = step.abs() / 2.0;
        axis.half_last = step.abs() / 2.0;
        Ok(axis)
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn order(&self) -> AxisOrder {
        self.order
    }

    pub fn min(&self) -> f64 {
        match self.order {
            AxisOrder::Ascending => self.values[0],
            AxisOrder::Descending => self.values[self.values.len() - 1],
        }
    }

    pub fn max(&self) -> f64 {
        match self.order {
            AxisOrder::Ascending => self.values[self.values.len() - 1],
            AxisOrder::Descending => self.values[0],
        }
    }

    /// Contiguous index range of the values lying in `[lo, hi]`.
    ///
    /// On a descending axis the range starts at the index of the highest
    /// value, so slicing by it keeps the stored order.
    pub fn index_range(&self, lo: f64, hi: f64) -> Range<usize> {
        let (start, end) = match self.order {
            AxisOrder::Ascending => (
                self.values.partition_point(|&v| v < lo),
                self.values.partition_point(|&v| v <= hi),
            ),
            AxisOrder::Descending => (
                self.values.partition_point(|&v| v > hi),
                self.values.partition_point(|&v| v >= lo),
            ),
        };
        start..end.max(start)
    }

    /// Index of the value nearest to `value`, or `None` when `value` lies
    /// more than half a step outside the axis.
    ///
    /// A single-value axis accepts anything within half of the spacing it
    /// had before being subset.
    pub fn nearest_index(&self, value: f64) -> Option<usize> {
        let n = self.values.len();
        if n == 0 {
            return None;
        }

        let (half_min, half_max) = match self.order {
            AxisOrder::Ascending => (self.half_first, self.half_last),
            AxisOrder::Descending => (self.half_last, self.half_first),
        };
        if !(value >= self.min() - half_min && value <= self.max() + half_max) {
            return None;
        }

        let i = match self.order {
            AxisOrder::Ascending => self.values.partition_point(|&v| v < value),
            AxisOrder::Descending => self.values.partition_point(|&v| v > value),
        };
        if i == 0 {
            return Some(0);
        }
        if i >= n {
            return Some(n - 1);
        }
        let before = (self.values[i - 1] - value).abs();
        let after = (self.values[i] - value).abs();
        Some(if before <= after { i - 1 } else { i })
    }

    /// Half the spacing between value `i` and its neighbour.
    fn half_spacing_at(&self, i: usize) -> f64 {
        let n = self.values.len();
        if i == 0 && n < 2 {
            self.half_first
        } else if i + 1 < n {
            (self.values[i + 1] - self.values[i]).abs() / 2.0
        } else {
            (self.values[i] - self.values[i - 1]).abs() / 2.0
        }
    }

    /// Copy of the values in `range`, order preserved.
    pub fn subset(&self, range: Range<usize>) -> Self {
        let (half_first, half_last) = if range.is_empty() {
            (0.0, 0.0)
        } else {
            (
                self.half_spacing_at(range.start),
                self.half_spacing_at(range.end - 1),
            )
        };
        Self {
            values: self.values[range].to_vec(),
            order: self.order,
            half_first,
            half_last,
        }
    }
}

/// Row and column ranges delimiting a sub-grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridSlice {
    pub rows: Range<usize>,
    pub cols: Range<usize>,
}

impl GridSlice {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.cols.is_empty()
    }

    /// `(rows, cols)` of the sub-grid.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.cols.len())
    }
}

/// The fixed grid: outer product of the `x` and `y` axes.
///
/// Cells are addressed `(row, col)` with rows along `y` and columns along
/// `x`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanGrid {
    x: ScanAxis,
    y: ScanAxis,
}

impl ScanGrid {
    pub fn new(x: ScanAxis, y: ScanAxis) -> Self {
        Self { x, y }
    }

    /// Build from raw axis values.
    pub fn from_values(x: Vec<f64>, y: Vec<f64>) -> GoesResult<Self> {
        Ok(Self {
            x: ScanAxis::new("x", x)?,
            y: ScanAxis::new("y", y)?,
        })
    }

    pub fn x(&self) -> &ScanAxis {
        &self.x
    }

    pub fn y(&self) -> &ScanAxis {
        &self.y
    }

    /// `(y.len(), x.len())`
    pub fn shape(&self) -> (usize, usize) {
        (self.y.len(), self.x.len())
    }

    /// Scan angles `(x, y)` of a cell.
    pub fn angles(&self, row: usize, col: usize) -> Option<(f64, f64)> {
        Some((*self.x.values.get(col)?, *self.y.values.get(row)?))
    }

    /// Nearest cell `(row, col)` to the given scan angles.
    pub fn nearest_cell(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        Some((self.y.nearest_index(y)?, self.x.nearest_index(x)?))
    }

    /// Restrict both axes to a sub-grid.
    ///
    /// Panics if the slice lies outside the grid; slices produced by
    /// [`crate::region::window_slice`] always fit.
    pub fn subset(&self, slice: &GridSlice) -> Self {
        Self {
            x: self.x.subset(slice.cols.clone()),
            y: self.y.subset(slice.rows.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_descending() {
        let axis = ScanAxis::new("y", vec![0.3, 0.2, 0.1]).unwrap();
        assert_eq!(axis.order(), AxisOrder::Descending);
        assert_eq!(axis.min(), 0.1);
        assert_eq!(axis.max(), 0.3);
    }

    #[test]
    fn test_rejects_non_monotonic() {
        assert!(matches!(
            ScanAxis::new("x", vec![0.0, 0.2, 0.1]),
            Err(GoesError::InvalidScanGrid(_))
        ));
        assert!(ScanAxis::new("x", vec![0.0, 0.0]).is_err());
        assert!(ScanAxis::new("x", vec![]).is_err());
        assert!(ScanAxis::new("x", vec![0.0, f64::NAN]).is_err());
    }

    #[test]
    fn test_index_range_ascending() {
        let axis = ScanAxis::new("x", vec![0.0, 1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(axis.index_range(1.0, 3.0), 1..4);
        assert_eq!(axis.index_range(0.5, 3.5), 1..4);
        assert_eq!(axis.index_range(5.0, 6.0), 5..5);
    }

    #[test]
    fn test_index_range_descending() {
        let axis = ScanAxis::new("y", vec![4.0, 3.0, 2.0, 1.0, 0.0]).unwrap();
        // y_max maps to the first row of the slice
        assert_eq!(axis.index_range(1.0, 3.0), 1..4);
        assert_eq!(axis.subset(axis.index_range(1.0, 3.0)).values(), &[3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_nearest_index() {
        let axis = ScanAxis::new("y", vec![4.0, 3.0, 2.0, 1.0]).unwrap();
        assert_eq!(axis.nearest_index(2.9), Some(1));
        assert_eq!(axis.nearest_index(2.4), Some(2));
        assert_eq!(axis.nearest_index(4.4), Some(0));
        assert_eq!(axis.nearest_index(4.6), None);
        assert_eq!(axis.nearest_index(0.6), Some(3));
        assert_eq!(axis.nearest_index(0.4), None);
    }

    #[test]
    fn test_single_column_subset_keeps_footprint() {
        let axis = ScanAxis::new("x", vec![0.0, 0.1, 0.2, 0.3]).unwrap();
        let column = axis.subset(2..3);
        assert_eq!(column.values(), &[0.2]);
        assert_eq!(column.nearest_index(0.2), Some(0));
        assert_eq!(column.nearest_index(0.24), Some(0));
        assert_eq!(column.nearest_index(0.16), Some(0));
        assert_eq!(column.nearest_index(0.26), None);
        assert_eq!(column.nearest_index(0.14), None);

        // Descending parent
        let y = ScanAxis::regular("y", 0.3, -0.1, 4).unwrap().subset(0..1);
        assert_eq!(y.nearest_index(0.34), Some(0));
        assert_eq!(y.nearest_index(0.36), None);
    }

    #[test]
    fn test_lone_value_axis_without_spacing() {
        let axis = ScanAxis::new("x", vec![0.5]).unwrap();
        assert_eq!(axis.nearest_index(0.5), Some(0));
        assert_eq!(axis.nearest_index(0.5001), None);

        let regular = ScanAxis::regular("x", 0.5, 0.01, 1).unwrap();
        assert_eq!(regular.nearest_index(0.504), Some(0));
    }
}
