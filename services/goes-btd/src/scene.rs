//! One band of one scan, with its lat/lon grid computed on demand.

use std::sync::OnceLock;

use goes_common::{BoundingBox, GoesError, GoesResult, Grid2D};
use netcdf_parser::{L1bMetadata, L1bRadiance};
use projection::{
    compute_geo_grid_with, select_window, window_slice, GeoGrid, IndexWindow, OffDiskPolicy,
    ScanGrid, SensorGeometry,
};
use radiometry::RadianceField;
use tracing::debug;

/// A loaded radiance dataset.
///
/// The lat/lon grid is the expensive part of region selection, so it is
/// computed at most once per scene and shared by every selection made on
/// it.
#[derive(Debug, Clone)]
pub struct Scene {
    geometry: SensorGeometry,
    scan: ScanGrid,
    field: RadianceField,
    metadata: L1bMetadata,
    policy: OffDiskPolicy,
    geo: OnceLock<GeoGrid>,
}

impl Scene {
    /// # Errors
    /// `ShapeMismatch` if the radiance grid is not co-indexed with `scan`.
    pub fn new(
        geometry: SensorGeometry,
        scan: ScanGrid,
        field: RadianceField,
        policy: OffDiskPolicy,
    ) -> GoesResult<Self> {
        if field.shape() != scan.shape() {
            return Err(GoesError::ShapeMismatch {
                expected: scan.shape(),
                actual: field.shape(),
            });
        }
        Ok(Self {
            geometry,
            scan,
            field,
            metadata: L1bMetadata::default(),
            policy,
            geo: OnceLock::new(),
        })
    }

    pub fn from_l1b(l1b: L1bRadiance, policy: OffDiskPolicy) -> GoesResult<Self> {
        Ok(Self::new(l1b.geometry, l1b.scan, l1b.field, policy)?.with_metadata(l1b.metadata))
    }

    pub fn with_metadata(mut self, metadata: L1bMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn geometry(&self) -> &SensorGeometry {
        &self.geometry
    }

    pub fn scan(&self) -> &ScanGrid {
        &self.scan
    }

    pub fn field(&self) -> &RadianceField {
        &self.field
    }

    pub fn metadata(&self) -> &L1bMetadata {
        &self.metadata
    }

    pub fn policy(&self) -> OffDiskPolicy {
        self.policy
    }

    /// Latitude/longitude of every cell, computed on first use.
    pub fn geo_grid(&self) -> &GeoGrid {
        self.geo.get_or_init(|| {
            debug!(shape = ?self.scan.shape(), "Computing lat/lon grid");
            compute_geo_grid_with(&self.geometry, &self.scan, self.policy)
        })
    }

    /// Whether [`Scene::geo_grid`] has already been computed.
    pub fn has_geo_grid(&self) -> bool {
        self.geo.get().is_some()
    }

    /// Scan window covering `bbox`.
    pub fn window(&self, bbox: &BoundingBox) -> GoesResult<IndexWindow> {
        select_window(self.geo_grid(), &self.scan, bbox)
    }

    /// Cut the scene down to a scan window.
    ///
    /// The subset carries the matching part of the lat/lon grid when it has
    /// been computed already.
    pub fn subset(&self, window: &IndexWindow) -> GoesResult<Scene> {
        let slice = window_slice(&self.scan, window)?;
        let radiance = self
            .field
            .radiance()
            .subset(slice.rows.clone(), slice.cols.clone());

        let geo = match self.geo.get() {
            Some(geo) => OnceLock::from(geo.subset(&slice)),
            None => OnceLock::new(),
        };

        Ok(Scene {
            geometry: self.geometry,
            scan: self.scan.subset(&slice),
            field: self.field.with_radiance(radiance),
            metadata: self.metadata.clone(),
            policy: self.policy,
            geo,
        })
    }

    /// The part of the scene covering `bbox`.
    pub fn select_region(&self, bbox: &BoundingBox) -> GoesResult<Scene> {
        let window = self.window(bbox)?;
        self.subset(&window)
    }

    pub fn brightness_temperature(&self) -> Grid2D<f64> {
        self.field.to_brightness_temperature()
    }

    /// Whether two scenes share geometry and scan grid, so that windows and
    /// cells of one apply to the other.
    pub fn same_grid(&self, other: &Scene) -> bool {
        self.geometry == other.geometry && self.scan == other.scan
    }
}
