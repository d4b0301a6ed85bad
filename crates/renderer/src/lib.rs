//! Map rendering for ABI brightness temperature products.
//!
//! - [`gradient`]: colors, colormaps and value normalization
//! - [`render`]: caller-owned [`RenderContext`] and nearest-cell rendering
//!   of fixed-grid fields onto a lat/lon canvas
//! - [`presets`]: temperature and BTD map styles
//! - [`png`]: PNG encoding (indexed when the palette fits)

pub mod gradient;
pub mod png;
pub mod presets;
pub mod render;

pub use gradient::{Color, Colormap, Normalization};
pub use render::{render_map, render_rgba, save_png, MapLayer, RenderContext};
