//! Ready-made render contexts for the two standard products.

use goes_common::{BoundingBox, GoesResult};

use crate::gradient::{Color, Colormap, Normalization};
use crate::render::RenderContext;

/// Temperature scale lower bound (K)
pub const TEMPERATURE_MIN_K: f64 = 200.0;
/// Temperature scale upper bound (K)
pub const TEMPERATURE_MAX_K: f64 = 300.0;
/// Number of filled-contour levels across the temperature scale
pub const TEMPERATURE_LEVELS: usize = 30;

/// BTD scale (K): green below `BTD_CENTER`, black at it, white above.
pub const BTD_MIN_K: f64 = -6.0;
pub const BTD_CENTER_K: f64 = 0.0;
pub const BTD_MAX_K: f64 = 1.5;
pub const BTD_LOW_COLOR: &str = "#06BA63";

/// Single-band brightness temperature: greys over 200-300 K in 30
/// levels, cold bright, out-of-range values clipped to the end colors.
pub fn temperature_map(extent: BoundingBox, long_side: usize) -> GoesResult<RenderContext> {
    RenderContext::fitted(
        extent,
        long_side,
        Colormap::greys(),
        Normalization::levels(TEMPERATURE_MIN_K, TEMPERATURE_MAX_K, TEMPERATURE_LEVELS)?,
    )
}

/// Brightness temperature difference: green-black-white with the center
/// of the ramp pinned at zero.
pub fn btd_map(extent: BoundingBox, long_side: usize) -> GoesResult<RenderContext> {
    RenderContext::fitted(
        extent,
        long_side,
        btd_colormap()?,
        Normalization::two_slope(BTD_MIN_K, BTD_CENTER_K, BTD_MAX_K)?,
    )
}

pub fn btd_colormap() -> GoesResult<Colormap> {
    Colormap::from_colors(&[Color::from_hex(BTD_LOW_COLOR)?, Color::BLACK, Color::WHITE])
}
