//! Error types shared by the projection, radiometry and rendering crates.

use thiserror::Error;

/// Result type alias using GoesError.
pub type GoesResult<T> = Result<T, GoesError>;

/// Primary error type for GOES processing.
///
/// Every variant in the first two groups is deterministic: the same inputs
/// always produce the same error, so none of them is worth retrying.
#[derive(Debug, Error)]
pub enum GoesError {
    // === Input Contract Errors ===
    #[error("Invalid sensor geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid scan grid: {0}")]
    InvalidScanGrid(String),

    #[error("Invalid bounding box: {0}")]
    InvalidBbox(String),

    #[error("Invalid calibration coefficients: {0}")]
    InvalidCalibration(String),

    // === Whole-Operation Failures ===
    #[error("Region selection matched no grid cells: {0}")]
    EmptyRegion(String),

    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Radiance outside the Planck domain: {0}")]
    Domain(f64),

    // === Collaborator Errors ===
    #[error("Data not available: {0}")]
    DataNotAvailable(String),

    #[error("Upstream request failed: {0}")]
    Upstream(String),

    #[error("Invalid NetCDF data: {0}")]
    NetCdf(String),

    #[error("Rendering failed: {0}")]
    Render(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GoesError {
    /// Whether the error signals a caller-input contract violation rather
    /// than a failure of an external collaborator.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            GoesError::InvalidGeometry(_)
                | GoesError::InvalidScanGrid(_)
                | GoesError::InvalidBbox(_)
                | GoesError::InvalidCalibration(_)
                | GoesError::EmptyRegion(_)
                | GoesError::ShapeMismatch { .. }
                | GoesError::Domain(_)
        )
    }
}
