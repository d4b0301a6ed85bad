//! Integration tests for scan angle to lat/lon conversion.

use projection::{compute_geo_grid, compute_geo_grid_with, OffDiskPolicy, ScanGrid, SensorGeometry};
use test_utils::{assert_approx_eq, assert_coords_approx_eq, fixtures, full_disk_axes, conus_axes};

fn geometry(params: (f64, f64, f64, f64)) -> SensorGeometry {
    let (req, rpol, lon, height) = params;
    SensorGeometry::from_degrees(req, rpol, lon, height).unwrap()
}

// ============================================================================
// Construction tests
// ============================================================================

#[test]
fn test_rejects_non_physical_geometry() {
    assert!(SensorGeometry::new(6378137.0, 0.0, 0.0, 35786023.0).is_err());
    assert!(SensorGeometry::new(6356752.0, 6378137.0, 0.0, 35786023.0).is_err());
    assert!(SensorGeometry::new(6378137.0, 6356752.0, 0.0, -1.0).is_err());
    assert!(SensorGeometry::new(f64::NAN, 6356752.0, 0.0, 35786023.0).is_err());
}

#[test]
fn test_from_degrees_matches_presets() {
    let built = geometry(fixtures::geometry::GOES_EAST);
    let preset = SensorGeometry::goes_east();
    assert_approx_eq!(built.projection_origin_longitude(), preset.projection_origin_longitude(), 1e-15);
    assert_eq!(built.semi_major_axis(), preset.semi_major_axis());
    assert_eq!(built.h(), 6378137.0 + 35786023.0);
}

// ============================================================================
// Point conversion tests
// ============================================================================

#[test]
fn test_sphere_nadir_is_sub_satellite_point() {
    let geom = geometry(fixtures::geometry::SPHERE);
    let (lat, lon) = geom.project(0.0, 0.0).unwrap();
    assert_coords_approx_eq!((lat, lon), (0.0, 0.0), 1e-9);
}

#[test]
fn test_goes_west_nadir() {
    let geom = geometry(fixtures::geometry::GOES_WEST);
    let (lat, lon) = geom.project(0.0, 0.0).unwrap();
    assert_coords_approx_eq!((lat, lon), (0.0, -137.2), 1e-9);
}

#[test]
fn test_northward_scan_gives_northern_latitude() {
    let geom = SensorGeometry::goes_east();
    let (lat, lon) = geom.project(0.0, 0.05).unwrap();
    assert!(lat > 0.0);
    assert_approx_eq!(lon, -75.2, 1e-9);

    // Positive x looks east
    let (_, lon_east) = geom.project(0.05, 0.0).unwrap();
    assert!(lon_east > -75.2);
}

#[test]
fn test_roundtrip_over_visible_points() {
    let geom = SensorGeometry::goes_east();
    for &(lat, lon) in &[(0.0, -75.2), (25.0, -80.0), (45.0, -120.0), (-30.0, -60.0), (60.0, -75.0)] {
        let (x, y) = geom.geo_to_scan(lat, lon).unwrap();
        let (lat2, lon2) = geom.project(x, y).unwrap();
        assert_coords_approx_eq!((lat2, lon2), (lat, lon), 1e-6);
    }
}

#[test]
fn test_longitude_wraps_across_antimeridian() {
    // GOES-West looks across 180°; results stay in [-180, 180]
    let geom = SensorGeometry::goes_west();
    let (_, lon) = geom.project(-0.12, 0.0).unwrap();
    assert!((-180.0..=180.0).contains(&lon));
    assert!(lon > 100.0, "expected an eastern-hemisphere longitude, got {}", lon);
}

// ============================================================================
// Grid tests
// ============================================================================

#[test]
fn test_grid_shape_follows_axes() {
    let (x, y) = conus_axes(12, 7);
    let scan = ScanGrid::from_values(x, y).unwrap();
    let geo = compute_geo_grid(&SensorGeometry::goes_east(), &scan);
    assert_eq!(geo.shape(), (7, 12));
    assert_eq!(geo.valid_count(), 7 * 12);
}

#[test]
fn test_grid_matches_point_conversion() {
    let geom = SensorGeometry::goes_east();
    let (x, y) = conus_axes(9, 5);
    let scan = ScanGrid::from_values(x.clone(), y.clone()).unwrap();
    let geo = compute_geo_grid(&geom, &scan);

    for (row, &yv) in y.iter().enumerate() {
        for (col, &xv) in x.iter().enumerate() {
            let expected = geom.project(xv, yv).unwrap();
            let actual = geo.get(row, col).unwrap();
            assert_eq!(actual, expected);
        }
    }
}

#[test]
fn test_invalidate_marks_off_disk_cells() {
    let geom = SensorGeometry::goes_east();
    let (x, y) = full_disk_axes(33);
    let scan = ScanGrid::from_values(x, y).unwrap();
    let geo = compute_geo_grid_with(&geom, &scan, OffDiskPolicy::Invalidate);

    // Corners see space
    let (lat, lon) = geo.get(0, 0).unwrap();
    assert!(lat.is_nan() && lon.is_nan());
    let (lat, lon) = geo.get(32, 32).unwrap();
    assert!(lat.is_nan() && lon.is_nan());

    // Center sees the sub-satellite point
    let (lat, lon) = geo.get(16, 16).unwrap();
    assert_coords_approx_eq!((lat, lon), (0.0, -75.2), 1e-9);

    // Latitude and longitude are invalid together
    assert_eq!(geo.lat().nan_count(), geo.lon().nan_count());
    assert!(geo.valid_count() < 33 * 33);
}

#[test]
fn test_absolute_discriminant_keeps_every_cell() {
    let geom = SensorGeometry::goes_east();
    let (x, y) = full_disk_axes(33);
    let scan = ScanGrid::from_values(x, y).unwrap();
    let strict = compute_geo_grid_with(&geom, &scan, OffDiskPolicy::Invalidate);
    let legacy = compute_geo_grid_with(&geom, &scan, OffDiskPolicy::AbsoluteDiscriminant);

    assert_eq!(legacy.valid_count(), 33 * 33);

    // On-disk cells agree between policies
    for row in 0..33 {
        for col in 0..33 {
            let (lat, lon) = strict.get(row, col).unwrap();
            if !lat.is_nan() {
                assert_eq!(legacy.get(row, col).unwrap(), (lat, lon));
            }
        }
    }
}

#[test]
fn test_policy_parse() {
    assert_eq!("invalidate".parse::<OffDiskPolicy>().unwrap(), OffDiskPolicy::Invalidate);
    assert_eq!("absolute".parse::<OffDiskPolicy>().unwrap(), OffDiskPolicy::AbsoluteDiscriminant);
    assert!("clip".parse::<OffDiskPolicy>().is_err());
    assert_eq!(OffDiskPolicy::default(), OffDiskPolicy::Invalidate);
}

#[test]
fn test_limb_is_near_expected_angle() {
    let geom = SensorGeometry::goes_east();
    let limb = fixtures::geometry::LIMB_SCAN_ANGLE;
    assert!(geom.project(limb - 0.002, 0.0).is_some());
    assert!(geom.project(limb + 0.002, 0.0).is_none());
}
