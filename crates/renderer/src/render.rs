//! Rendering of fixed-grid fields onto a lat/lon canvas.
//!
//! The canvas is an equirectangular (Plate Carrée) image of the context's
//! extent. Every output pixel is mapped back to scan angles and takes the
//! value of the nearest fixed-grid cell, so no resampling of the source
//! grid is needed and the image keeps the sensor's native footprint.

use std::path::{Path, PathBuf};

use goes_common::{BoundingBox, GoesError, GoesResult, Grid2D};
use projection::{ScanGrid, SensorGeometry};
use rayon::prelude::*;
use tracing::{debug, info, instrument};

use crate::gradient::{Color, Colormap, Normalization};
use crate::png::encode_png;

/// Everything about the output image that is not data.
///
/// Owned by the caller and passed to each render call; rendering itself
/// keeps no state.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderContext {
    pub width: usize,
    pub height: usize,
    pub extent: BoundingBox,
    pub colormap: Colormap,
    pub normalization: Normalization,
    /// Color of pixels with no data (off the grid, off the disk, NaN)
    pub background: Color,
}

impl RenderContext {
    pub fn new(
        width: usize,
        height: usize,
        extent: BoundingBox,
        colormap: Colormap,
        normalization: Normalization,
    ) -> GoesResult<Self> {
        if width == 0 || height == 0 {
            return Err(GoesError::Render(format!("empty canvas {}x{}", width, height)));
        }
        Ok(Self {
            width,
            height,
            extent,
            colormap,
            normalization,
            background: Color::transparent(),
        })
    }

    /// Canvas with square pixels in degrees whose longer side is
    /// `long_side` pixels.
    pub fn fitted(
        extent: BoundingBox,
        long_side: usize,
        colormap: Colormap,
        normalization: Normalization,
    ) -> GoesResult<Self> {
        let aspect = extent.width() / extent.height();
        let (width, height) = if aspect >= 1.0 {
            (long_side, ((long_side as f64 / aspect).round() as usize).max(1))
        } else {
            (((long_side as f64 * aspect).round() as usize).max(1), long_side)
        };
        Self::new(width, height, extent, colormap, normalization)
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    /// `(lon, lat)` of a pixel center; row 0 is the northern edge.
    pub fn pixel_center(&self, px: usize, py: usize) -> (f64, f64) {
        let lon = self.extent.west() + (px as f64 + 0.5) * self.extent.width() / self.width as f64;
        let lat = self.extent.north() - (py as f64 + 0.5) * self.extent.height() / self.height as f64;
        (lon, lat)
    }

    /// Color for one data value; NaN gets the background.
    pub fn color_for(&self, value: f64) -> Color {
        match self.normalization.normalize(value) {
            Some(t) => self.colormap.color_at(t),
            None => self.background,
        }
    }
}

/// A field on its fixed grid, ready to draw.
#[derive(Debug, Clone, Copy)]
pub struct MapLayer<'a> {
    geometry: &'a SensorGeometry,
    scan: &'a ScanGrid,
    values: &'a Grid2D<f64>,
}

impl<'a> MapLayer<'a> {
    /// Pair values with the grid they were sampled on.
    ///
    /// # Errors
    /// `ShapeMismatch` if `values` is not co-indexed with `scan`.
    pub fn new(
        geometry: &'a SensorGeometry,
        scan: &'a ScanGrid,
        values: &'a Grid2D<f64>,
    ) -> GoesResult<Self> {
        if values.shape() != scan.shape() {
            return Err(GoesError::ShapeMismatch {
                expected: scan.shape(),
                actual: values.shape(),
            });
        }
        Ok(Self {
            geometry,
            scan,
            values,
        })
    }

    /// Value of the grid cell nearest to a geographic point, if any.
    pub fn sample(&self, lon: f64, lat: f64) -> Option<f64> {
        let (x, y) = self.geometry.geo_to_scan(lat, lon)?;
        let (row, col) = self.scan.nearest_cell(x, y)?;
        self.values.get(row, col).copied()
    }
}

/// Render a layer to RGBA pixels (row-major, 4 bytes per pixel).
#[instrument(skip_all, fields(width = ctx.width, height = ctx.height, extent = %ctx.extent))]
pub fn render_rgba(ctx: &RenderContext, layer: &MapLayer<'_>) -> Vec<u8> {
    let mut pixels = vec![0u8; ctx.width * ctx.height * 4];

    pixels
        .par_chunks_mut(ctx.width * 4)
        .enumerate()
        .for_each(|(py, row)| {
            for (px, out) in row.chunks_exact_mut(4).enumerate() {
                let (lon, lat) = ctx.pixel_center(px, py);
                let color = match layer.sample(lon, lat) {
                    Some(value) => ctx.color_for(value),
                    None => ctx.background,
                };
                out.copy_from_slice(&color.to_rgba());
            }
        });

    pixels
}

/// Render a layer and encode it as PNG.
pub fn render_map(ctx: &RenderContext, layer: &MapLayer<'_>) -> GoesResult<Vec<u8>> {
    let pixels = render_rgba(ctx, layer);
    let png = encode_png(&pixels, ctx.width, ctx.height)?;
    debug!(bytes = png.len(), "Encoded map");
    Ok(png)
}

/// Write PNG bytes to `{fig_dir}/{fig_name}.png`, creating `fig_dir`.
pub fn save_png(png: &[u8], fig_dir: &Path, fig_name: &str) -> GoesResult<PathBuf> {
    std::fs::create_dir_all(fig_dir)?;
    let path = fig_dir.join(format!("{}.png", fig_name));
    std::fs::write(&path, png)?;
    info!(path = %path.display(), bytes = png.len(), "Saved figure");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(width: usize, height: usize) -> RenderContext {
        RenderContext::new(
            width,
            height,
            BoundingBox::new(-100.0, -90.0, 30.0, 40.0).unwrap(),
            Colormap::greys(),
            Normalization::linear(0.0, 1.0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_pixel_centers() {
        let ctx = context(10, 5);
        assert_eq!(ctx.pixel_center(0, 0), (-99.5, 39.0));
        assert_eq!(ctx.pixel_center(9, 4), (-90.5, 31.0));
    }

    #[test]
    fn test_fitted_keeps_aspect() {
        let extent = BoundingBox::new(-73.0, -57.0, 33.0, 46.0).unwrap();
        let ctx = RenderContext::fitted(
            extent,
            800,
            Colormap::greys(),
            Normalization::linear(0.0, 1.0).unwrap(),
        )
        .unwrap();
        assert_eq!(ctx.width, 800);
        assert_eq!(ctx.height, 650);
    }

    #[test]
    fn test_empty_canvas_rejected() {
        let result = RenderContext::new(
            0,
            10,
            BoundingBox::new(-100.0, -90.0, 30.0, 40.0).unwrap(),
            Colormap::greys(),
            Normalization::linear(0.0, 1.0).unwrap(),
        );
        assert!(matches!(result, Err(GoesError::Render(_))));
    }

    #[test]
    fn test_nan_uses_background() {
        let ctx = context(2, 2).with_background(Color::new(1, 2, 3, 4));
        assert_eq!(ctx.color_for(f64::NAN), Color::new(1, 2, 3, 4));
        assert_eq!(ctx.color_for(0.0), Color::WHITE);
    }
}
