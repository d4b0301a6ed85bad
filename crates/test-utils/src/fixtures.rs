//! Common test fixtures for goes-btd tests.
//!
//! Values mirror what real ABI L1b files carry so tests exercise the same
//! numeric ranges as production data.

/// Satellite geometry as `(semi_major, semi_minor, lon_origin_deg, height)`.
pub mod geometry {
    /// GRS80 ellipsoid from the GOES-East slot (75.2°W).
    pub const GOES_EAST: (f64, f64, f64, f64) = (6378137.0, 6356752.31414, -75.2, 35786023.0);

    /// GRS80 ellipsoid from the GOES-West slot (137.2°W).
    pub const GOES_WEST: (f64, f64, f64, f64) = (6378137.0, 6356752.31414, -137.2, 35786023.0);

    /// Spherical Earth over the prime meridian.
    pub const SPHERE: (f64, f64, f64, f64) = (6378137.0, 6378137.0, 0.0, 35786023.0);

    /// Half-width of the Earth disk in scan angle for GRS80 (radians).
    pub const LIMB_SCAN_ANGLE: f64 = 0.1518;
}

/// Bounding boxes as `(west, east, south, north)` in degrees.
pub mod extent {
    /// Northeast Pacific off the US west coast
    pub const NORTHEAST_PACIFIC: (f64, f64, f64, f64) = (-135.0, -115.0, 30.0, 50.0);

    /// Gulf of Mexico
    pub const GULF_OF_MEXICO: (f64, f64, f64, f64) = (-98.0, -80.0, 18.0, 31.0);

    /// Kansas and surroundings
    pub const CENTRAL_PLAINS: (f64, f64, f64, f64) = (-102.0, -94.0, 36.0, 41.0);

    /// Entirely on the far side of the Earth from GOES-East
    pub const INDIAN_OCEAN: (f64, f64, f64, f64) = (70.0, 90.0, -20.0, 0.0);
}

/// ABI Planck calibration constants as `(fk1, fk2, bc1, bc2)`.
pub mod calibration {
    /// Band 7 (3.9 µm shortwave window)
    pub const BAND_07: (f64, f64, f64, f64) = (202263.0, 3698.19, 0.43361, 0.99939);

    /// Band 13 (10.3 µm clean longwave window)
    pub const BAND_13: (f64, f64, f64, f64) = (10803.3, 1392.74, 0.07550, 0.99975);

    /// Band 14 (11.2 µm longwave window)
    pub const BAND_14: (f64, f64, f64, f64) = (8510.22, 1286.27, 0.22516, 0.99920);

    /// Band 15 (12.3 µm dirty longwave window)
    pub const BAND_15: (f64, f64, f64, f64) = (6454.62, 1173.03, 0.21702, 0.99916);
}

/// Packed fixed-grid axes as stored in ABI files.
pub mod scan {
    /// `x` scale factor and add offset of the 2 km CONUS sector.
    pub const CONUS_X_PACKING: (f64, f64) = (5.6e-5, -0.101332);

    /// `y` scale factor and add offset of the 2 km CONUS sector.
    pub const CONUS_Y_PACKING: (f64, f64) = (-5.6e-5, 0.128212);

    /// Scan angle step of 2 km bands (radians).
    pub const STEP_2KM: f64 = 5.6e-5;
}
