//! NetCDF parser for GOES-R ABI Level-1b radiance files.
//!
//! ABI L1b files (`OR_ABI-L1b-Rad*`) carry one band of one scan: packed
//! fixed-grid coordinates `x`/`y`, packed radiance `Rad`, the
//! `goes_imager_projection` attributes describing the satellite geometry,
//! and the Planck coefficients needed to turn radiance into brightness
//! temperature.
//!
//! Files can be read from disk or from an in-memory buffer (for example
//! the body of an S3 download).

pub mod error;
pub mod native;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use projection::{ScanGrid, SensorGeometry};
use radiometry::RadianceField;

pub use error::{NetCdfError, NetCdfResult};
pub use native::{load_l1b_from_bytes, load_l1b_from_path, silence_hdf5_errors};

/// File-level metadata of an L1b file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct L1bMetadata {
    /// Satellite ID (e.g. "G16", "G19")
    pub platform_id: Option<String>,
    /// Scene type (e.g. "Full Disk", "CONUS", "Mesoscale")
    pub scene_id: Option<String>,
    /// Mid-point of the scan
    pub time: Option<DateTime<Utc>>,
}

/// Contents of one L1b radiance file.
#[derive(Debug, Clone)]
pub struct L1bRadiance {
    pub geometry: SensorGeometry,
    pub scan: ScanGrid,
    pub field: RadianceField,
    pub metadata: L1bMetadata,
}

/// Parse the scan start time out of an ABI file name.
///
/// Names look like `OR_ABI-L1b-RadF-M6C13_G19_s20250710640208_e..._c....nc`
/// where the start token is `sYYYYJJJHHMMSSt` (day of year, tenths of a
/// second).
pub fn parse_scan_start(file_name: &str) -> Option<DateTime<Utc>> {
    let token = file_name
        .split('_')
        .find(|part| part.len() == 15 && part.starts_with('s'))?;
    let digits = &token[1..];
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let year: i32 = digits[0..4].parse().ok()?;
    let ordinal: u32 = digits[4..7].parse().ok()?;
    let hour: u32 = digits[7..9].parse().ok()?;
    let minute: u32 = digits[9..11].parse().ok()?;
    let second: u32 = digits[11..13].parse().ok()?;
    let tenths: u32 = digits[13..14].parse().ok()?;

    let naive = NaiveDate::from_yo_opt(year, ordinal)?
        .and_hms_milli_opt(hour, minute, second, tenths * 100)?;
    Utc.from_local_datetime(&naive).single()
}
