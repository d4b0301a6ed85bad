//! Brightness temperature difference between two bands.

use goes_common::{GoesResult, Grid2D};

/// Element-wise `t1 - t2`.
///
/// Both grids must cover the same cells; no broadcasting is done. NaN in
/// either input propagates to the output.
///
/// # Errors
/// `ShapeMismatch` if the shapes differ.
pub fn brightness_temperature_difference(
    t1: &Grid2D<f64>,
    t2: &Grid2D<f64>,
) -> GoesResult<Grid2D<f64>> {
    t1.zip_with(t2, |a, b| a - b)
}
