//! Tests for BoundingBox construction, parsing and containment.

use goes_common::{BoundingBox, GoesError};

// ============================================================================
// Constructor tests
// ============================================================================

#[test]
fn test_bbox_new() {
    let bbox = BoundingBox::new(-73.0, -57.0, 33.0, 46.0).unwrap();
    assert_eq!(bbox.to_extent(), [-73.0, -57.0, 33.0, 46.0]);
    assert_eq!(bbox.width(), 16.0);
    assert_eq!(bbox.height(), 13.0);
}

#[test]
fn test_bbox_rejects_inverted_longitudes() {
    let result = BoundingBox::new(-57.0, -73.0, 33.0, 46.0);
    assert!(matches!(result, Err(GoesError::InvalidBbox(_))));
}

#[test]
fn test_bbox_rejects_inverted_latitudes() {
    let result = BoundingBox::new(-73.0, -57.0, 46.0, 33.0);
    assert!(matches!(result, Err(GoesError::InvalidBbox(_))));
}

#[test]
fn test_bbox_rejects_degenerate() {
    assert!(BoundingBox::new(10.0, 10.0, 0.0, 1.0).is_err());
    assert!(BoundingBox::new(0.0, 1.0, 5.0, 5.0).is_err());
}

#[test]
fn test_bbox_rejects_nan() {
    assert!(BoundingBox::new(f64::NAN, 1.0, 0.0, 1.0).is_err());
}

// ============================================================================
// from_extent_str tests
// ============================================================================

#[test]
fn test_parse_extent_with_spaces() {
    let bbox = BoundingBox::from_extent_str(" -73.5, -57.25 ,33, 46.125").unwrap();
    assert_eq!(bbox.west(), -73.5);
    assert_eq!(bbox.east(), -57.25);
    assert_eq!(bbox.south(), 33.0);
    assert_eq!(bbox.north(), 46.125);
}

#[test]
fn test_parse_extent_wrong_count() {
    assert!(matches!(
        BoundingBox::from_extent_str("-73,-57,33"),
        Err(GoesError::InvalidBbox(_))
    ));
}

#[test]
fn test_parse_extent_not_a_number() {
    assert!(matches!(
        BoundingBox::from_extent_str("-73,abc,33,46"),
        Err(GoesError::InvalidBbox(_))
    ));
}

// ============================================================================
// Containment tests
// ============================================================================

#[test]
fn test_contains_box() {
    let outer = BoundingBox::new(-80.0, -50.0, 30.0, 50.0).unwrap();
    let inner = BoundingBox::new(-73.0, -57.0, 33.0, 46.0).unwrap();
    assert!(outer.contains_box(&inner));
    assert!(!inner.contains_box(&outer));
    assert!(outer.contains_box(&outer));
}

// ============================================================================
// Serde tests
// ============================================================================

#[test]
fn test_serde_extent_array() {
    let bbox: BoundingBox = serde_json::from_str("[-73.0, -57.0, 33.0, 46.0]").unwrap();
    assert_eq!(bbox.west(), -73.0);

    let json = serde_json::to_string(&bbox).unwrap();
    assert_eq!(json, "[-73.0,-57.0,33.0,46.0]");
}

#[test]
fn test_serde_rejects_invalid_extent() {
    let result: Result<BoundingBox, _> = serde_json::from_str("[10.0, 0.0, 33.0, 46.0]");
    assert!(result.is_err());
}
