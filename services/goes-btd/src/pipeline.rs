//! Fetch, project, subset, calibrate and render.

use std::path::PathBuf;

use goes_common::{GoesError, GoesResult, ScanRequest};
use netcdf_parser::{load_l1b_from_bytes, parse_scan_start};
use projection::OffDiskPolicy;
use radiometry::brightness_temperature_difference;
use renderer::{presets, render_map, save_png, MapLayer};
use tracing::{info, instrument, warn};

use crate::config::PlotOptions;
use crate::scene::Scene;
use crate::source::DataSourceFetcher;

/// Download and parse the file a request names.
#[instrument(skip(fetcher), fields(request = %request))]
pub async fn load_scene(
    fetcher: &dyn DataSourceFetcher,
    request: &ScanRequest,
    policy: OffDiskPolicy,
) -> GoesResult<Scene> {
    request.validate()?;
    let (file, data) = fetcher.fetch_scan(request).await?;
    info!(key = %file.key, size = data.len(), "Fetched radiance file");

    let l1b = tokio::task::spawn_blocking(move || load_l1b_from_bytes(&data))
        .await
        .map_err(|e| GoesError::NetCdf(format!("parser task failed: {}", e)))??;

    if l1b.field.band_id().is_some_and(|band| band != request.band) {
        warn!(
            requested = request.band,
            found = ?l1b.field.band_id(),
            "File band differs from request"
        );
    }

    let mut metadata = l1b.metadata.clone();
    if metadata.time.is_none() {
        metadata.time = parse_scan_start(file.file_name());
    }
    Ok(Scene::from_l1b(l1b, policy)?.with_metadata(metadata))
}

/// Default figure name of a single-band plot: `goes19_13_20250312_0640`.
pub fn temperature_fig_name(request: &ScanRequest) -> String {
    format!(
        "{}_{:02}_{}",
        request.satellite,
        request.band,
        request.time_label()
    )
}

/// Default figure name of a difference plot: `goes19_13-07_20250312_0640`.
pub fn btd_fig_name(request: &ScanRequest, minus_band: u8) -> String {
    format!(
        "{}_{:02}-{:02}_{}",
        request.satellite,
        request.band,
        minus_band,
        request.time_label()
    )
}

/// Human readable title of a difference plot.
pub fn btd_title(request: &ScanRequest, minus_band: u8, wavelength: f64, minus_wavelength: f64) -> String {
    format!(
        "ABI B{:02} - B{:02} ({:.1} µm - {:.1} µm) BTD {} d{} t{:02}{}0",
        request.band,
        minus_band,
        wavelength,
        minus_wavelength,
        request.satellite,
        request.date.format("%Y%m%d"),
        request.hour,
        request.ten_minute_index
    )
}

/// Render the brightness temperature of one band over the plot extent.
pub fn render_temperature(scene: &Scene, options: &PlotOptions) -> GoesResult<Vec<u8>> {
    let region = scene.select_region(&options.extent)?;
    let temperature = region.brightness_temperature();

    let ctx = presets::temperature_map(options.extent, options.image_size)?;
    let layer = MapLayer::new(region.geometry(), region.scan(), &temperature)?;
    render_map(&ctx, &layer)
}

/// Render `scene - minus` brightness temperatures over the plot extent.
///
/// Both scenes must share their fixed grid; the window is selected once on
/// `scene` and applied to both.
pub fn render_btd(scene: &Scene, minus: &Scene, options: &PlotOptions) -> GoesResult<Vec<u8>> {
    if scene.scan().shape() != minus.scan().shape() {
        return Err(GoesError::ShapeMismatch {
            expected: scene.scan().shape(),
            actual: minus.scan().shape(),
        });
    }
    if !scene.same_grid(minus) {
        warn!("Band grids share a shape but not their scan angles");
    }

    let window = scene.window(&options.extent)?;
    let region = scene.subset(&window)?;
    let minus_region = minus.subset(&window)?;

    let btd = brightness_temperature_difference(
        &region.brightness_temperature(),
        &minus_region.brightness_temperature(),
    )?;

    let ctx = presets::btd_map(options.extent, options.image_size)?;
    let layer = MapLayer::new(region.geometry(), region.scan(), &btd)?;
    render_map(&ctx, &layer)
}

/// Fetch one band and save its brightness temperature map.
pub async fn plot_temperature(
    fetcher: &dyn DataSourceFetcher,
    request: &ScanRequest,
    options: &PlotOptions,
    policy: OffDiskPolicy,
) -> GoesResult<PathBuf> {
    let scene = load_scene(fetcher, request, policy).await?;
    let png = render_temperature(&scene, options)?;

    let fig_name = options
        .fig_name
        .clone()
        .unwrap_or_else(|| temperature_fig_name(request));
    save_png(&png, &options.fig_dir, &fig_name)
}

/// Fetch two bands and save the map of their brightness temperature
/// difference (`request.band - minus_band`).
pub async fn plot_btd(
    fetcher: &dyn DataSourceFetcher,
    request: &ScanRequest,
    minus_band: u8,
    options: &PlotOptions,
    policy: OffDiskPolicy,
) -> GoesResult<PathBuf> {
    let minus_request = ScanRequest {
        band: minus_band,
        ..request.clone()
    };

    let scene = load_scene(fetcher, request, policy).await?;
    let minus = load_scene(fetcher, &minus_request, policy).await?;

    info!(
        title = %btd_title(
            request,
            minus_band,
            scene.field().band_wavelength(),
            minus.field().band_wavelength()
        ),
        "Rendering BTD"
    );
    let png = render_btd(&scene, &minus, options)?;

    let fig_name = options
        .fig_name
        .clone()
        .unwrap_or_else(|| btd_fig_name(request, minus_band));
    save_png(&png, &options.fig_dir, &fig_name)
}
