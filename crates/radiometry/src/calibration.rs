//! Planck-function inversion for ABI emissive bands.
//!
//! ABI L1b files carry per-band coefficients so that
//!
//! ```text
//! T = (fk2 / ln(fk1 / L + 1) - bc1) / bc2
//! ```
//!
//! turns a spectral radiance `L` (mW m⁻² sr⁻¹ (cm⁻¹)⁻¹) into a brightness
//! temperature in kelvin.
//!
//! Reference: GOES-R PUG Volume 3, Section 5.1.3.8.1

use goes_common::{GoesError, GoesResult, Grid2D};
use rayon::prelude::*;
use tracing::debug;

/// Planck constants of one band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanckCoefficients {
    fk1: f64,
    fk2: f64,
    bc1: f64,
    bc2: f64,
}

impl PlanckCoefficients {
    /// Validate and wrap the four coefficients.
    ///
    /// `fk1` and `fk2` must be positive and `bc2` non-zero.
    pub fn new(fk1: f64, fk2: f64, bc1: f64, bc2: f64) -> GoesResult<Self> {
        if ![fk1, fk2, bc1, bc2].iter().all(|v| v.is_finite()) {
            return Err(GoesError::InvalidCalibration(format!(
                "non-finite coefficient in fk1={} fk2={} bc1={} bc2={}",
                fk1, fk2, bc1, bc2
            )));
        }
        if fk1 <= 0.0 || fk2 <= 0.0 {
            return Err(GoesError::InvalidCalibration(format!(
                "fk1 and fk2 must be positive, got {} and {}",
                fk1, fk2
            )));
        }
        if bc2 == 0.0 {
            return Err(GoesError::InvalidCalibration("bc2 must be non-zero".to_string()));
        }
        Ok(Self { fk1, fk2, bc1, bc2 })
    }

    pub fn fk1(&self) -> f64 {
        self.fk1
    }

    pub fn fk2(&self) -> f64 {
        self.fk2
    }

    pub fn bc1(&self) -> f64 {
        self.bc1
    }

    pub fn bc2(&self) -> f64 {
        self.bc2
    }

    /// Brightness temperature (K) of one radiance value.
    ///
    /// # Errors
    /// `Domain` when the radiance is not a positive finite number.
    pub fn brightness_temperature(&self, radiance: f64) -> GoesResult<f64> {
        if !radiance.is_finite() || radiance <= 0.0 {
            return Err(GoesError::Domain(radiance));
        }
        Ok(self.planck(radiance))
    }

    /// Radiance that converts back to temperature `t` (K).
    ///
    /// Returns NaN for temperatures outside the band's invertible range.
    pub fn radiance_for_temperature(&self, t: f64) -> f64 {
        let effective = self.bc1 + self.bc2 * t;
        if effective <= 0.0 {
            return f64::NAN;
        }
        self.fk1 / ((self.fk2 / effective).exp() - 1.0)
    }

    #[inline]
    fn planck(&self, radiance: f64) -> f64 {
        (self.fk2 / (self.fk1 / radiance + 1.0).ln() - self.bc1) / self.bc2
    }
}

/// Radiance grid of one band, co-indexed with its scan grid.
#[derive(Debug, Clone, PartialEq)]
pub struct RadianceField {
    radiance: Grid2D<f64>,
    coefficients: PlanckCoefficients,
    /// Central wavelength (µm)
    band_wavelength: f64,
    band_id: Option<u8>,
}

impl RadianceField {
    pub fn new(
        radiance: Grid2D<f64>,
        coefficients: PlanckCoefficients,
        band_wavelength: f64,
        band_id: Option<u8>,
    ) -> Self {
        Self {
            radiance,
            coefficients,
            band_wavelength,
            band_id,
        }
    }

    pub fn radiance(&self) -> &Grid2D<f64> {
        &self.radiance
    }

    pub fn coefficients(&self) -> &PlanckCoefficients {
        &self.coefficients
    }

    pub fn band_wavelength(&self) -> f64 {
        self.band_wavelength
    }

    pub fn band_id(&self) -> Option<u8> {
        self.band_id
    }

    pub fn shape(&self) -> (usize, usize) {
        self.radiance.shape()
    }

    /// Same band metadata over a different radiance grid, typically a
    /// subset of this one.
    pub fn with_radiance(&self, radiance: Grid2D<f64>) -> Self {
        Self {
            radiance,
            coefficients: self.coefficients,
            band_wavelength: self.band_wavelength,
            band_id: self.band_id,
        }
    }

    /// Brightness temperature (K) of every cell.
    ///
    /// Cells whose radiance is not positive (sensor fill, space pixels)
    /// come out as NaN instead of failing the whole grid.
    pub fn to_brightness_temperature(&self) -> Grid2D<f64> {
        let coefficients = self.coefficients;
        let (rows, cols) = self.radiance.shape();
        let mut out = Grid2D::filled(rows, cols, f64::NAN);

        out.as_mut_slice()
            .par_iter_mut()
            .zip(self.radiance.as_slice().par_iter())
            .for_each(|(t, &l)| {
                if l.is_finite() && l > 0.0 {
                    *t = coefficients.planck(l);
                }
            });

        debug!(
            band = ?self.band_id,
            invalid = out.nan_count(),
            "Converted radiance to brightness temperature"
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band13() -> PlanckCoefficients {
        PlanckCoefficients::new(10803.3, 1392.74, 0.07550, 0.99975).unwrap()
    }

    #[test]
    fn test_rejects_bad_coefficients() {
        assert!(PlanckCoefficients::new(0.0, 1392.74, 0.0755, 0.99975).is_err());
        assert!(PlanckCoefficients::new(10803.3, -1.0, 0.0755, 0.99975).is_err());
        assert!(PlanckCoefficients::new(10803.3, 1392.74, 0.0755, 0.0).is_err());
        assert!(matches!(
            PlanckCoefficients::new(f64::NAN, 1392.74, 0.0755, 0.99975),
            Err(GoesError::InvalidCalibration(_))
        ));
    }

    #[test]
    fn test_typical_band13_radiance() {
        // ~100 radiance units is a warm surface near 290 K at 10.3 µm
        let t = band13().brightness_temperature(100.0).unwrap();
        assert!((280.0..300.0).contains(&t), "got {}", t);
    }

    #[test]
    fn test_domain_errors() {
        let c = band13();
        assert!(matches!(c.brightness_temperature(0.0), Err(GoesError::Domain(_))));
        assert!(matches!(c.brightness_temperature(-3.0), Err(GoesError::Domain(_))));
        assert!(c.brightness_temperature(f64::NAN).is_err());
        assert!(c.brightness_temperature(f64::INFINITY).is_err());
    }

    #[test]
    fn test_inverse_of_zero_kelvin_effective() {
        let c = band13();
        assert!(c.radiance_for_temperature(-1.0).is_nan());
    }
}
