//! Radiometric conversions for ABI infrared bands.
//!
//! - [`calibration`]: Planck coefficients and radiance to brightness
//!   temperature
//! - [`btd`]: brightness temperature differences between bands
//! - [`srf`]: reformatting of spectral response function tables

pub mod btd;
pub mod calibration;
pub mod srf;

pub use btd::brightness_temperature_difference;
pub use calibration::{PlanckCoefficients, RadianceField};
pub use srf::{reformat_srf, reformat_srf_text};
