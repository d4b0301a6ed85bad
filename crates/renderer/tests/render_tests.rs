//! Tests for map rendering and the standard presets.

use goes_common::{BoundingBox, GoesError, Grid2D};
use projection::{compute_geo_grid, select_window, window_slice, ScanAxis, ScanGrid, SensorGeometry};
use renderer::presets::{btd_map, temperature_map};
use renderer::{
    render_map, render_rgba, save_png, Color, Colormap, MapLayer, Normalization, RenderContext,
};
use test_utils::{conus_axes, create_constant_grid, create_radiance_grid, fixtures};

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

fn bbox(extent: (f64, f64, f64, f64)) -> BoundingBox {
    BoundingBox::new(extent.0, extent.1, extent.2, extent.3).unwrap()
}

fn conus_scan(cols: usize, rows: usize) -> ScanGrid {
    let (x, y) = conus_axes(cols, rows);
    ScanGrid::from_values(x, y).unwrap()
}

fn pixel(pixels: &[u8], width: usize, px: usize, py: usize) -> [u8; 4] {
    let i = (py * width + px) * 4;
    [pixels[i], pixels[i + 1], pixels[i + 2], pixels[i + 3]]
}

// ============================================================================
// Preset tests
// ============================================================================

#[test]
fn test_temperature_preset_clips_and_orders() {
    let ctx = temperature_map(bbox(fixtures::extent::CENTRAL_PLAINS), 200).unwrap();
    // Cold is bright
    assert_eq!(ctx.color_for(150.0), Color::WHITE);
    assert_eq!(ctx.color_for(350.0), Color::BLACK);
    let cold = ctx.color_for(210.0);
    let warm = ctx.color_for(290.0);
    assert!(cold.r > warm.r);
    // Quantized: values in the same band share a color
    assert_eq!(ctx.color_for(250.1), ctx.color_for(250.2));
}

#[test]
fn test_btd_preset_colors() {
    let ctx = btd_map(bbox(fixtures::extent::CENTRAL_PLAINS), 200).unwrap();
    assert_eq!(ctx.color_for(-6.0), Color::new(0x06, 0xBA, 0x63, 255));
    assert_eq!(ctx.color_for(-20.0), Color::new(0x06, 0xBA, 0x63, 255));
    assert_eq!(ctx.color_for(0.0), Color::BLACK);
    assert_eq!(ctx.color_for(1.5), Color::WHITE);
    assert_eq!(ctx.color_for(5.0), Color::WHITE);
    // Half way up the positive slope is mid grey
    assert_eq!(ctx.color_for(0.75).r, 128);
}

// ============================================================================
// Rendering tests
// ============================================================================

#[test]
fn test_constant_field_fills_covered_canvas() {
    let geometry = SensorGeometry::goes_east();
    let scan = conus_scan(200, 120);
    let values = Grid2D::from_vec(120, 200, create_constant_grid(200, 120, 250.0)).unwrap();
    let layer = MapLayer::new(&geometry, &scan, &values).unwrap();

    let ctx = temperature_map(bbox(fixtures::extent::CENTRAL_PLAINS), 64).unwrap();
    let pixels = render_rgba(&ctx, &layer);
    assert_eq!(pixels.len(), ctx.width * ctx.height * 4);

    let expected = ctx.color_for(250.0).to_rgba();
    for py in 0..ctx.height {
        for px in 0..ctx.width {
            assert_eq!(pixel(&pixels, ctx.width, px, py), expected);
        }
    }
}

#[test]
fn test_area_outside_grid_is_background() {
    let geometry = SensorGeometry::goes_east();
    let scan = conus_scan(50, 30);
    let values = Grid2D::from_vec(30, 50, create_radiance_grid(50, 30)).unwrap();
    let layer = MapLayer::new(&geometry, &scan, &values).unwrap();

    let ctx = temperature_map(bbox(fixtures::extent::INDIAN_OCEAN), 32)
        .unwrap()
        .with_background(Color::new(10, 20, 30, 255));
    let pixels = render_rgba(&ctx, &layer);
    assert!(pixels
        .chunks_exact(4)
        .all(|px| px == [10, 20, 30, 255]));
}

#[test]
fn test_nan_cells_are_background() {
    let geometry = SensorGeometry::goes_east();
    let scan = conus_scan(40, 25);
    let values = Grid2D::filled(25, 40, f64::NAN);
    let layer = MapLayer::new(&geometry, &scan, &values).unwrap();

    let ctx = btd_map(bbox(fixtures::extent::CENTRAL_PLAINS), 16).unwrap();
    let pixels = render_rgba(&ctx, &layer);
    assert!(pixels.chunks_exact(4).all(|px| px == [0, 0, 0, 0]));
}

#[test]
fn test_single_column_region_is_drawn() {
    let geometry = SensorGeometry::goes_east();
    let scan = ScanGrid::new(
        ScanAxis::regular("x", -0.010, 0.001, 21).unwrap(),
        ScanAxis::regular("y", 0.010, -0.001, 21).unwrap(),
    );
    let geo = compute_geo_grid(&geometry, &scan);

    // Narrower than one cell in longitude around nadir
    let extent = BoundingBox::new(-75.3, -75.1, -2.0, 2.0).unwrap();
    let window = select_window(&geo, &scan, &extent).unwrap();
    let region = scan.subset(&window_slice(&scan, &window).unwrap());
    let (rows, cols) = region.shape();
    assert_eq!(cols, 1);
    assert!(rows > 1);

    let values = Grid2D::filled(rows, cols, 250.0);
    let layer = MapLayer::new(&geometry, &region, &values).unwrap();
    let ctx = RenderContext::new(
        20,
        20,
        extent,
        Colormap::greys(),
        Normalization::linear(200.0, 300.0).unwrap(),
    )
    .unwrap();

    let pixels = render_rgba(&ctx, &layer);
    let expected = ctx.color_for(250.0).to_rgba();
    assert!(pixels.chunks_exact(4).all(|px| px == expected));
}

#[test]
fn test_layer_shape_checked() {
    let geometry = SensorGeometry::goes_east();
    let scan = conus_scan(40, 25);
    let values = Grid2D::filled(40, 25, 1.0);
    assert!(matches!(
        MapLayer::new(&geometry, &scan, &values),
        Err(GoesError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_render_map_writes_png() {
    let geometry = SensorGeometry::goes_east();
    let scan = conus_scan(120, 70);
    let values = Grid2D::from_vec(70, 120, create_radiance_grid(120, 70)).unwrap();
    let layer = MapLayer::new(&geometry, &scan, &values).unwrap();

    let ctx = btd_map(bbox(fixtures::extent::GULF_OF_MEXICO), 90).unwrap();
    let png = render_map(&ctx, &layer).unwrap();

    assert_eq!(&png[0..8], &PNG_SIGNATURE);
    assert_eq!(&png[12..16], b"IHDR");
    let width = u32::from_be_bytes([png[16], png[17], png[18], png[19]]);
    let height = u32::from_be_bytes([png[20], png[21], png[22], png[23]]);
    assert_eq!((width as usize, height as usize), (ctx.width, ctx.height));

    let dir = tempfile::tempdir().unwrap();
    let fig_dir = dir.path().join("GOES_plots");
    let path = save_png(&png, &fig_dir, "goes19_13-07_20250312_0640").unwrap();
    assert_eq!(path, fig_dir.join("goes19_13-07_20250312_0640.png"));
    assert_eq!(std::fs::read(&path).unwrap(), png);
}
