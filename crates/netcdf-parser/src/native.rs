//! Native NetCDF parsing using the netcdf library.
//!
//! # Performance Notes
//!
//! The netcdf library requires a file path (it wraps libnetcdf/HDF5 which need
//! file handles). When reading from bytes, we write to a temp file first.
//!
//! On Linux, we use `/dev/shm` (memory-backed tmpfs) to minimize I/O latency.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Once;

use chrono::{DateTime, Duration, TimeZone, Utc};
use goes_common::Grid2D;
use projection::{ScanAxis, ScanGrid, SensorGeometry};
use radiometry::{PlanckCoefficients, RadianceField};
use tracing::{debug, instrument};

use crate::error::{NetCdfError, NetCdfResult};
use crate::{L1bMetadata, L1bRadiance};

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints verbose error messages to stderr even when errors
/// are handled gracefully by the Rust code (e.g., when checking for optional
/// attributes that don't exist). This function disables that output by
/// calling H5Eset_auto2 with null handlers. It only needs to be called once
/// per process, but is safe to call multiple times.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and we're passing null pointers
        // to disable error output, which is a documented valid use.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// Load an ABI L1b radiance file held in memory.
///
/// The bytes are spilled to a temp file that is removed again whether or
/// not parsing succeeds.
pub fn load_l1b_from_bytes(data: &[u8]) -> NetCdfResult<L1bRadiance> {
    silence_hdf5_errors();

    let temp = TempFile::new(get_optimal_temp_dir().join(generate_temp_filename()));
    let mut file = std::fs::File::create(temp.path())?;
    file.write_all(data)?;
    drop(file);

    load_l1b_from_path(temp.path())
}

/// Load an ABI L1b radiance file from disk.
#[instrument(fields(path = %path.display()))]
pub fn load_l1b_from_path(path: &Path) -> NetCdfResult<L1bRadiance> {
    silence_hdf5_errors();

    let nc_file = netcdf::open(path)
        .map_err(|e| NetCdfError::InvalidFormat(format!("Failed to open NetCDF: {}", e)))?;

    let scan = read_scan_grid(&nc_file)?;
    let geometry = read_geometry(&nc_file)?;
    let radiance = read_radiance(&nc_file, scan.shape())?;

    let coefficients = PlanckCoefficients::new(
        read_scalar(&nc_file, "planck_fk1")?,
        read_scalar(&nc_file, "planck_fk2")?,
        read_scalar(&nc_file, "planck_bc1")?,
        read_scalar(&nc_file, "planck_bc2")?,
    )?;
    let band_wavelength = read_scalar(&nc_file, "band_wavelength")?;
    let band_id = read_scalar(&nc_file, "band_id")
        .ok()
        .filter(|v| (1.0..=16.0).contains(v))
        .map(|v| v as u8);

    let metadata = L1bMetadata {
        platform_id: get_global_str_attr(&nc_file, "platform_ID"),
        scene_id: get_global_str_attr(&nc_file, "scene_id"),
        time: read_scalar(&nc_file, "t").ok().and_then(j2000_to_datetime),
    };

    debug!(
        shape = ?scan.shape(),
        band = ?band_id,
        fill = radiance.nan_count(),
        "Loaded L1b radiance"
    );

    Ok(L1bRadiance {
        geometry,
        scan,
        field: RadianceField::new(radiance, coefficients, band_wavelength, band_id),
        metadata,
    })
}

// =============================================================================
// Variable readers
// =============================================================================

fn variable<'f>(nc_file: &'f netcdf::File, name: &str) -> NetCdfResult<netcdf::Variable<'f>> {
    nc_file
        .variable(name)
        .ok_or_else(|| NetCdfError::MissingData(format!("{} variable", name)))
}

/// Unpack a fixed-grid coordinate stored as scaled shorts.
fn read_axis(nc_file: &netcdf::File, name: &str) -> NetCdfResult<ScanAxis> {
    let var = variable(nc_file, name)?;
    let raw: Vec<i16> = var
        .get_values(..)
        .map_err(|e| NetCdfError::InvalidFormat(format!("Failed to read {}: {}", name, e)))?;
    let scale = get_f64_attr(&var, "scale_factor")
        .ok_or_else(|| NetCdfError::MissingData(format!("{}:scale_factor", name)))?;
    let offset = get_f64_attr(&var, "add_offset")
        .ok_or_else(|| NetCdfError::MissingData(format!("{}:add_offset", name)))?;
    Ok(ScanAxis::from_packed(name, &raw, scale, offset)?)
}

fn read_scan_grid(nc_file: &netcdf::File) -> NetCdfResult<ScanGrid> {
    Ok(ScanGrid::new(
        read_axis(nc_file, "x")?,
        read_axis(nc_file, "y")?,
    ))
}

fn read_geometry(nc_file: &netcdf::File) -> NetCdfResult<SensorGeometry> {
    let proj_var = variable(nc_file, "goes_imager_projection")?;
    let required = |name: &str| {
        get_f64_attr(&proj_var, name)
            .ok_or_else(|| NetCdfError::MissingData(format!("goes_imager_projection:{}", name)))
    };

    Ok(SensorGeometry::from_degrees(
        required("semi_major_axis")?,
        required("semi_minor_axis")?,
        required("longitude_of_projection_origin")?,
        required("perspective_point_height")?,
    )?)
}

/// Read `Rad`, applying scale/offset and turning fill values into NaN.
fn read_radiance(nc_file: &netcdf::File, shape: (usize, usize)) -> NetCdfResult<Grid2D<f64>> {
    let rad_var = variable(nc_file, "Rad")?;
    let raw: Vec<i16> = rad_var
        .get_values(..)
        .map_err(|e| NetCdfError::InvalidFormat(format!("Failed to read Rad: {}", e)))?;

    let scale = get_f64_attr(&rad_var, "scale_factor").unwrap_or(1.0);
    let offset = get_f64_attr(&rad_var, "add_offset").unwrap_or(0.0);
    let fill_value = get_i16_attr(&rad_var, "_FillValue");
    // Counts are stored as shorts flagged unsigned
    let unsigned = get_str_attr(&rad_var, "_Unsigned").is_some_and(|v| v == "true");

    let data: Vec<f64> = raw
        .iter()
        .map(|&val| {
            if Some(val) == fill_value {
                f64::NAN
            } else if unsigned {
                val as u16 as f64 * scale + offset
            } else {
                val as f64 * scale + offset
            }
        })
        .collect();

    let (rows, cols) = shape;
    Grid2D::from_vec(rows, cols, data).map_err(|_| {
        NetCdfError::InvalidFormat(format!(
            "Rad has {} values, scan grid is {}x{}",
            raw.len(),
            rows,
            cols
        ))
    })
}

/// Read a scalar or single-element variable as f64.
fn read_scalar(nc_file: &netcdf::File, name: &str) -> NetCdfResult<f64> {
    let var = variable(nc_file, name)?;
    let values: Vec<f64> = var
        .get_values(..)
        .map_err(|e| NetCdfError::InvalidFormat(format!("Failed to read {}: {}", name, e)))?;
    values
        .first()
        .copied()
        .ok_or_else(|| NetCdfError::MissingData(format!("{} is empty", name)))
}

/// Seconds since 2000-01-01 12:00:00 UTC to a timestamp.
fn j2000_to_datetime(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    let j2000 = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).single()?;
    Some(j2000 + Duration::milliseconds((seconds * 1000.0).round() as i64))
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Temp file removed on drop.
struct TempFile(PathBuf);

impl TempFile {
    fn new(path: PathBuf) -> Self {
        Self(path)
    }

    fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

/// Get the optimal temp directory for NetCDF file operations.
///
/// On Linux, uses /dev/shm (memory-backed tmpfs) if available for faster I/O.
/// Falls back to the system temp directory on other platforms or if /dev/shm is unavailable.
fn get_optimal_temp_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        let shm_path = Path::new("/dev/shm");
        if shm_path.exists() && shm_path.is_dir() {
            // Verify we can write to /dev/shm
            let test_path = shm_path.join(format!(".netcdf_test_{}", std::process::id()));
            if std::fs::write(&test_path, b"test").is_ok() {
                let _ = std::fs::remove_file(&test_path);
                return shm_path.to_path_buf();
            }
        }
    }

    std::env::temp_dir()
}

/// Generate a unique temp file name for concurrent safety.
/// Uses process ID, thread ID, and a counter to ensure uniqueness.
fn generate_temp_filename() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let pid = std::process::id();
    let tid = std::thread::current().id();
    let count = COUNTER.fetch_add(1, Ordering::Relaxed);

    format!("goes_l1b_{}_{:?}_{}.nc", pid, tid, count)
}

/// Check if a variable has an attribute with the given name.
/// This avoids HDF5 error spam when checking for optional attributes.
fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

fn get_f64_attr(var: &netcdf::Variable, name: &str) -> Option<f64> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    f64::try_from(attr_value).ok()
}

fn get_i16_attr(var: &netcdf::Variable, name: &str) -> Option<i16> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    i16::try_from(attr_value).ok()
}

fn get_str_attr(var: &netcdf::Variable, name: &str) -> Option<String> {
    if !has_attr(var, name) {
        return None;
    }
    match var.attribute_value(name)?.ok()? {
        netcdf::AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}

fn get_global_str_attr(nc_file: &netcdf::File, name: &str) -> Option<String> {
    if !nc_file.attributes().any(|attr| attr.name() == name) {
        return None;
    }
    match nc_file.attribute(name)?.value().ok()? {
        netcdf::AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}
