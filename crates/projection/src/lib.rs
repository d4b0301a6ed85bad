//! Fixed-grid geometry for GOES-R ABI imagery.
//!
//! - [`geostationary`]: scan angle to latitude/longitude (and back)
//! - [`scan`]: scan angle axes with explicit ordering
//! - [`region`]: selection of a scan window covering a geographic box

pub mod geostationary;
pub mod region;
pub mod scan;

pub use geostationary::{compute_geo_grid, compute_geo_grid_with, GeoGrid, OffDiskPolicy, SensorGeometry};
pub use region::{apply_window, select_window, window_slice, IndexWindow};
pub use scan::{AxisOrder, GridSlice, ScanAxis, ScanGrid};
