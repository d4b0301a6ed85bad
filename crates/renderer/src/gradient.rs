//! Color ramps and value normalization for field rendering.

use goes_common::{GoesError, GoesResult};

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0, 255);
    pub const WHITE: Color = Color::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn transparent() -> Self {
        Self { r: 0, g: 0, b: 0, a: 0 }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA`.
    pub fn from_hex(hex: &str) -> GoesResult<Self> {
        let digits = hex.trim_start_matches('#');
        let channel = |i: usize| {
            digits
                .get(i..i + 2)
                .and_then(|c| u8::from_str_radix(c, 16).ok())
                .ok_or_else(|| GoesError::Render(format!("invalid hex color '{}'", hex)))
        };
        match digits.len() {
            6 => Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, 255)),
            8 => Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => Err(GoesError::Render(format!("invalid hex color '{}'", hex))),
        }
    }

    #[inline]
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Linear blend between two colors, `t` clamped to [0, 1].
pub fn interpolate_color(color1: Color, color2: Color, t: f64) -> Color {
    let t = t.clamp(0.0, 1.0);
    let t_inv = 1.0 - t;
    let mix = |a: u8, b: u8| (a as f64 * t_inv + b as f64 * t).round() as u8;

    Color::new(
        mix(color1.r, color2.r),
        mix(color1.g, color2.g),
        mix(color1.b, color2.b),
        mix(color1.a, color2.a),
    )
}

/// Piecewise-linear color ramp over [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct Colormap {
    stops: Vec<(f64, Color)>,
}

impl Colormap {
    /// Build from `(position, color)` stops.
    ///
    /// Positions must start at 0, end at 1 and increase.
    pub fn from_stops(stops: Vec<(f64, Color)>) -> GoesResult<Self> {
        if stops.len() < 2 {
            return Err(GoesError::Render("a colormap needs at least two stops".to_string()));
        }
        let first = stops[0].0;
        let last = stops[stops.len() - 1].0;
        if first != 0.0 || last != 1.0 || stops.windows(2).any(|w| w[1].0 <= w[0].0) {
            return Err(GoesError::Render(format!(
                "colormap stops must increase from 0 to 1, got {:?}",
                stops.iter().map(|s| s.0).collect::<Vec<_>>()
            )));
        }
        Ok(Self { stops })
    }

    /// Evenly spaced stops through `colors`.
    pub fn from_colors(colors: &[Color]) -> GoesResult<Self> {
        let n = colors.len();
        if n < 2 {
            return Err(GoesError::Render("a colormap needs at least two colors".to_string()));
        }
        Self::from_stops(
            colors
                .iter()
                .enumerate()
                .map(|(i, c)| (i as f64 / (n - 1) as f64, *c))
                .collect(),
        )
    }

    /// White at 0 to black at 1, so cold (low) temperatures are bright.
    pub fn greys() -> Self {
        Self {
            stops: vec![(0.0, Color::WHITE), (1.0, Color::BLACK)],
        }
    }

    /// The same ramp with its direction flipped.
    pub fn reversed(&self) -> Self {
        let mut stops: Vec<(f64, Color)> = self.stops.iter().map(|(p, c)| (1.0 - p, *c)).collect();
        stops.reverse();
        Self { stops }
    }

    /// Color at position `t` (clamped to [0, 1]).
    pub fn color_at(&self, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        let upper = self
            .stops
            .iter()
            .position(|(p, _)| *p >= t)
            .unwrap_or(self.stops.len() - 1)
            .max(1);
        let (p0, c0) = self.stops[upper - 1];
        let (p1, c1) = self.stops[upper];
        interpolate_color(c0, c1, (t - p0) / (p1 - p0))
    }
}

/// Mapping from data values to colormap positions in [0, 1].
///
/// Values outside the range are clipped to the ends of the colormap.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalization {
    /// Linear between `vmin` and `vmax`.
    Linear { vmin: f64, vmax: f64 },
    /// Filled-contour style: each value takes the color of the middle of
    /// the band between consecutive levels it falls in.
    Levels { levels: Vec<f64> },
    /// Two linear segments meeting at `vcenter`, which maps to 0.5.
    TwoSlope { vmin: f64, vcenter: f64, vmax: f64 },
}

impl Normalization {
    pub fn linear(vmin: f64, vmax: f64) -> GoesResult<Self> {
        if !vmin.is_finite() || !vmax.is_finite() || vmin >= vmax {
            return Err(GoesError::Render(format!("need vmin < vmax, got {} and {}", vmin, vmax)));
        }
        Ok(Normalization::Linear { vmin, vmax })
    }

    /// `n` evenly spaced levels from `lo` to `hi`, both included.
    pub fn levels(lo: f64, hi: f64, n: usize) -> GoesResult<Self> {
        if n < 2 || !lo.is_finite() || !hi.is_finite() || lo >= hi {
            return Err(GoesError::Render(format!(
                "need at least two levels over an increasing range, got {} over {}..{}",
                n, lo, hi
            )));
        }
        let step = (hi - lo) / (n - 1) as f64;
        Ok(Normalization::Levels {
            levels: (0..n).map(|i| lo + i as f64 * step).collect(),
        })
    }

    pub fn two_slope(vmin: f64, vcenter: f64, vmax: f64) -> GoesResult<Self> {
        if ![vmin, vcenter, vmax].iter().all(|v| v.is_finite()) || vmin >= vcenter || vcenter >= vmax {
            return Err(GoesError::Render(format!(
                "need vmin < vcenter < vmax, got {} {} {}",
                vmin, vcenter, vmax
            )));
        }
        Ok(Normalization::TwoSlope { vmin, vcenter, vmax })
    }

    /// Colormap position of `value`, or `None` for NaN.
    pub fn normalize(&self, value: f64) -> Option<f64> {
        if value.is_nan() {
            return None;
        }
        let t = match self {
            Normalization::Linear { vmin, vmax } => (value - vmin) / (vmax - vmin),
            Normalization::Levels { levels } => {
                let bands = levels.len() - 1;
                // Number of levels at or below the value picks the band
                match levels.partition_point(|&l| l <= value) {
                    0 => 0.0,
                    i if i > bands => 1.0,
                    i => (i as f64 - 0.5) / bands as f64,
                }
            }
            Normalization::TwoSlope { vmin, vcenter, vmax } => {
                if value < *vcenter {
                    0.5 * (value - vmin) / (vcenter - vmin)
                } else {
                    0.5 + 0.5 * (value - vcenter) / (vmax - vcenter)
                }
            }
        };
        Some(t.clamp(0.0, 1.0))
    }
}
