//! Error types for NetCDF parsing operations.

use goes_common::GoesError;
use thiserror::Error;

/// Result type for NetCDF parser operations.
pub type NetCdfResult<T> = Result<T, NetCdfError>;

/// Error types for NetCDF parsing.
#[derive(Error, Debug)]
pub enum NetCdfError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Missing required variable or attribute
    #[error("Missing required data: {0}")]
    MissingData(String),

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// File contents violate a geometry or calibration invariant
    #[error(transparent)]
    Invalid(#[from] GoesError),
}

impl From<NetCdfError> for GoesError {
    fn from(err: NetCdfError) -> Self {
        match err {
            NetCdfError::IoError(e) => GoesError::Io(e),
            NetCdfError::Invalid(e) => e,
            other => GoesError::NetCdf(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_data_maps_to_netcdf() {
        let err: GoesError = NetCdfError::MissingData("Rad variable".to_string()).into();
        assert!(matches!(err, GoesError::NetCdf(msg) if msg.contains("Rad variable")));
    }

    #[test]
    fn test_invariant_errors_pass_through() {
        let inner = GoesError::InvalidGeometry("height".to_string());
        let err: GoesError = NetCdfError::Invalid(inner).into();
        assert!(matches!(err, GoesError::InvalidGeometry(_)));
    }
}
