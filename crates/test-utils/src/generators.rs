//! Test data generators for creating synthetic scan grids and radiances.
//!
//! Generators return plain vectors so any crate in the workspace can use
//! them without a dependency cycle.

/// Evenly spaced scan angles.
pub fn regular_axis(start: f64, step: f64, n: usize) -> Vec<f64> {
    (0..n).map(|i| start + i as f64 * step).collect()
}

/// Coarse CONUS-like axes `(x, y)` as seen from GOES-East.
///
/// `x` ascends west to east and `y` descends north to south, as in real
/// files, with `cols` and `rows` samples spanning the CONUS sector.
pub fn conus_axes(cols: usize, rows: usize) -> (Vec<f64>, Vec<f64>) {
    let (x0, x1) = (-0.101332, 0.038612);
    let (y0, y1) = (0.128212, 0.044268);
    let x_step = (x1 - x0) / (cols.max(2) - 1) as f64;
    let y_step = (y1 - y0) / (rows.max(2) - 1) as f64;
    (regular_axis(x0, x_step, cols), regular_axis(y0, y_step, rows))
}

/// Full-disk axes reaching slightly past the limb on every side.
///
/// `y` descends like real files.
pub fn full_disk_axes(n: usize) -> (Vec<f64>, Vec<f64>) {
    let half = 0.16;
    let step = 2.0 * half / (n.max(2) - 1) as f64;
    (regular_axis(-half, step, n), regular_axis(half, -step, n))
}

/// Radiance grid (row-major, `rows * cols`) that warms from north to south.
///
/// Values stay within the physical range of longwave IR radiance
/// (mW m⁻² sr⁻¹ (cm⁻¹)⁻¹).
pub fn create_radiance_grid(cols: usize, rows: usize) -> Vec<f64> {
    let mut data = Vec::with_capacity(cols * rows);
    for row in 0..rows {
        let t = row as f64 / rows.max(1) as f64;
        for col in 0..cols {
            let s = col as f64 / cols.max(1) as f64;
            data.push(40.0 + 70.0 * t + 5.0 * (s * std::f64::consts::PI).sin());
        }
    }
    data
}

/// Constant-valued grid.
pub fn create_constant_grid(cols: usize, rows: usize, value: f64) -> Vec<f64> {
    vec![value; cols * rows]
}

/// Grid with NaN in every `nan_every`-th cell.
pub fn create_grid_with_nans(cols: usize, rows: usize, value: f64, nan_every: usize) -> Vec<f64> {
    (0..cols * rows)
        .map(|i| {
            if nan_every > 0 && i % nan_every == 0 {
                f64::NAN
            } else {
                value
            }
        })
        .collect()
}

/// Spectral response function text in the three-column layout of the NOAA
/// SRF tables: wavelength (µm), wavenumber (cm⁻¹), relative response.
pub fn create_srf_text(samples: usize) -> String {
    let mut text = String::new();
    for i in 0..samples {
        let wavelength = 10.0 + i as f64 * 0.01;
        let wavenumber = 10_000.0 / wavelength;
        let response = 1.0 - ((i as f64 - samples as f64 / 2.0) / samples as f64).abs();
        text.push_str(&format!("{:.4} {:.4} {:.6}\n", wavelength, wavenumber, response));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conus_axes_orientation() {
        let (x, y) = conus_axes(10, 6);
        assert_eq!(x.len(), 10);
        assert_eq!(y.len(), 6);
        assert!(x.windows(2).all(|w| w[1] > w[0]));
        assert!(y.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn test_full_disk_axes_cross_limb() {
        let (x, _) = full_disk_axes(33);
        assert!(x[0] < -0.152);
        assert!(x[32] > 0.152);
    }

    #[test]
    fn test_radiance_grid_positive() {
        let data = create_radiance_grid(8, 4);
        assert_eq!(data.len(), 32);
        assert!(data.iter().all(|v| *v > 0.0));
    }

    #[test]
    fn test_srf_text_lines() {
        let text = create_srf_text(5);
        assert_eq!(text.lines().count(), 5);
        assert_eq!(text.lines().next().unwrap().split_whitespace().count(), 3);
    }
}
