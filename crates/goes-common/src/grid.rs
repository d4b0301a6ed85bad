//! Row-major two-dimensional grids.

use std::ops::Range;

use crate::error::{GoesError, GoesResult};

/// A dense row-major 2D array.
///
/// Rows follow the scan grid's `y` axis and columns its `x` axis, so
/// `get(row, col)` addresses the cell at `(x[col], y[row])`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid2D<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T> Grid2D<T> {
    /// Wrap a row-major buffer, checking that its length matches the shape.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> GoesResult<Self> {
        if data.len() != rows * cols {
            // Flat buffer has no shape of its own; report it as a column.
            return Err(GoesError::ShapeMismatch {
                expected: (rows, cols),
                actual: (data.len(), 1),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.data.get(row * self.cols + col)
    }

    /// One row as a slice.
    pub fn row(&self, row: usize) -> &[T] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Fail with `ShapeMismatch` unless `other` has the same shape.
    pub fn ensure_same_shape<U>(&self, other: &Grid2D<U>) -> GoesResult<()> {
        if self.shape() != other.shape() {
            return Err(GoesError::ShapeMismatch {
                expected: self.shape(),
                actual: other.shape(),
            });
        }
        Ok(())
    }

    /// Apply `f` to every cell, keeping the shape.
    pub fn map<U, F>(&self, f: F) -> Grid2D<U>
    where
        F: Fn(&T) -> U,
    {
        Grid2D {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(f).collect(),
        }
    }

    /// Combine two grids of the same shape cell by cell.
    pub fn zip_with<U, V, F>(&self, other: &Grid2D<U>, f: F) -> GoesResult<Grid2D<V>>
    where
        F: Fn(&T, &U) -> V,
    {
        self.ensure_same_shape(other)?;
        Ok(Grid2D {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(a, b)| f(a, b))
                .collect(),
        })
    }
}

impl<T: Clone> Grid2D<T> {
    /// A grid filled with a single value.
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Copy out the sub-grid covering `rows` x `cols`.
    ///
    /// Ranges are clamped to the grid; the result keeps row-major order.
    pub fn subset(&self, rows: Range<usize>, cols: Range<usize>) -> Self {
        let rows = rows.start.min(self.rows)..rows.end.min(self.rows);
        let cols = cols.start.min(self.cols)..cols.end.min(self.cols);
        let n_rows = rows.end.saturating_sub(rows.start);
        let n_cols = cols.end.saturating_sub(cols.start);

        let mut data = Vec::with_capacity(n_rows * n_cols);
        for row in rows {
            let start = row * self.cols;
            data.extend_from_slice(&self.data[start + cols.start..start + cols.end]);
        }

        Self {
            rows: n_rows,
            cols: n_cols,
            data,
        }
    }
}

impl Grid2D<f64> {
    /// Minimum and maximum over finite cells, or `None` if there are none.
    pub fn finite_range(&self) -> Option<(f64, f64)> {
        self.data
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Number of NaN cells.
    pub fn nan_count(&self) -> usize {
        self.data.iter().filter(|v| v.is_nan()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec_rejects_bad_length() {
        let result = Grid2D::from_vec(2, 3, vec![0.0; 5]);
        assert!(matches!(result, Err(GoesError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_subset_row_major() {
        // value = row * 10 + col
        let data: Vec<i32> = (0..4)
            .flat_map(|r| (0..5).map(move |c| r * 10 + c))
            .collect();
        let grid = Grid2D::from_vec(4, 5, data).unwrap();

        let sub = grid.subset(1..3, 2..5);
        assert_eq!(sub.shape(), (2, 3));
        assert_eq!(sub.as_slice(), &[12, 13, 14, 22, 23, 24]);
    }

    #[test]
    fn test_zip_with_shape_mismatch() {
        let a = Grid2D::filled(2, 2, 1.0);
        let b = Grid2D::filled(2, 3, 1.0);
        assert!(matches!(
            a.zip_with(&b, |x, y| x - y),
            Err(GoesError::ShapeMismatch {
                expected: (2, 2),
                actual: (2, 3)
            })
        ));
    }

    #[test]
    fn test_finite_range_skips_nan() {
        let grid = Grid2D::from_vec(1, 4, vec![f64::NAN, 3.0, -1.0, f64::NAN]).unwrap();
        assert_eq!(grid.finite_range(), Some((-1.0, 3.0)));
        assert_eq!(grid.nan_count(), 2);
    }
}
