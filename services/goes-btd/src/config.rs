//! Command line and job file configuration.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use goes_common::{BoundingBox, GoesError, GoesResult, Product, Satellite, ScanRequest};
use projection::OffDiskPolicy;
use serde::Deserialize;

/// Extent of the example north-west Atlantic scene.
pub const DEFAULT_EXTENT: &str = "-73,-57,33,46";
pub const DEFAULT_FIG_DIR: &str = "figures";
pub const DEFAULT_IMAGE_SIZE: usize = 1000;

/// GOES ABI brightness temperature maps
#[derive(Parser, Debug)]
#[command(name = "goes-btd")]
#[command(about = "Brightness temperature and BTD maps from GOES-R ABI L1b radiances")]
pub struct Args {
    /// Read files from a local mirror of the NOAA buckets instead of S3
    #[arg(long, env = "GOES_SOURCE_DIR", global = true)]
    pub source_dir: Option<PathBuf>,

    /// Path-style S3 endpoint replacing the public AWS one
    #[arg(long, env = "GOES_S3_ENDPOINT", global = true)]
    pub s3_endpoint: Option<String>,

    /// How cells whose line of sight misses the Earth are treated
    /// (invalidate | absolute)
    #[arg(long, default_value = "invalidate", env = "GOES_OFF_DISK_POLICY", global = true)]
    pub off_disk_policy: OffDiskPolicy,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG", global = true)]
    pub log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, env = "GOES_LOG_FORMAT", global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Plot the brightness temperature of one band
    Temperature {
        /// ABI band (1-16)
        #[arg(long, default_value_t = 13)]
        band: u8,

        #[command(flatten)]
        scene: SceneArgs,
    },

    /// Plot the brightness temperature difference band1 - band2
    Btd {
        #[arg(long, default_value_t = 13)]
        band1: u8,

        #[arg(long, default_value_t = 7)]
        band2: u8,

        #[command(flatten)]
        scene: SceneArgs,
    },

    /// Run every plot listed in a YAML job file
    Job {
        file: PathBuf,
    },

    /// Reformat a spectral response function table to `{output}.dat`
    Srf {
        input: PathBuf,
        output: PathBuf,
    },
}

/// Which scan to plot and where the figure goes.
#[derive(clap::Args, Debug, Clone)]
pub struct SceneArgs {
    #[arg(long, default_value = "goes19")]
    pub satellite: Satellite,

    #[arg(long, default_value = "RadF")]
    pub product: Product,

    /// Observation date (YYYY-MM-DD)
    #[arg(long)]
    pub date: NaiveDate,

    /// Hour of day (UTC)
    #[arg(long)]
    pub hour: u32,

    /// Which file of the hour to use (0 = first scan)
    #[arg(long, default_value_t = 0)]
    pub index: usize,

    /// Map extent "west,east,south,north" in degrees
    #[arg(long, default_value = DEFAULT_EXTENT, value_parser = parse_extent, allow_hyphen_values = true)]
    pub extent: BoundingBox,

    #[arg(long, default_value = DEFAULT_FIG_DIR, env = "GOES_FIG_DIR")]
    pub fig_dir: PathBuf,

    /// Output name without extension; derived from the request when absent
    #[arg(long)]
    pub fig_name: Option<String>,

    /// Longer side of the output image in pixels
    #[arg(long, default_value_t = DEFAULT_IMAGE_SIZE)]
    pub image_size: usize,
}

impl SceneArgs {
    pub fn request(&self, band: u8) -> GoesResult<ScanRequest> {
        let request = ScanRequest {
            satellite: self.satellite,
            product: self.product,
            band,
            date: self.date,
            hour: self.hour,
            ten_minute_index: self.index,
        };
        request.validate()?;
        Ok(request)
    }

    pub fn plot_options(&self) -> PlotOptions {
        PlotOptions {
            extent: self.extent,
            fig_dir: self.fig_dir.clone(),
            fig_name: self.fig_name.clone(),
            image_size: self.image_size,
        }
    }
}

fn parse_extent(s: &str) -> Result<BoundingBox, String> {
    BoundingBox::from_extent_str(s).map_err(|e| e.to_string())
}

/// Output settings of one plot.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotOptions {
    pub extent: BoundingBox,
    pub fig_dir: PathBuf,
    pub fig_name: Option<String>,
    pub image_size: usize,
}

// =============================================================================
// Job files
// =============================================================================

/// A batch of plots read from YAML.
///
/// ```yaml
/// fig_dir: figures
/// plots:
///   - satellite: goes19
///     band: 13
///     minus_band: 7
///     date: 2025-03-12
///     hour: 6
///     index: 4
///     extent: [-73, -57, 33, 46]
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct JobConfig {
    /// Directory for figures without their own `fig_dir`
    #[serde(default = "default_fig_dir")]
    pub fig_dir: PathBuf,

    /// Longer image side for every plot
    #[serde(default = "default_image_size")]
    pub image_size: usize,

    pub plots: Vec<PlotJob>,
}

/// One plot: a single band, or a band difference when `minus_band` is set.
#[derive(Debug, Clone, Deserialize)]
pub struct PlotJob {
    pub satellite: Satellite,

    #[serde(default)]
    pub product: Product,

    pub band: u8,

    #[serde(default)]
    pub minus_band: Option<u8>,

    pub date: NaiveDate,

    pub hour: u32,

    #[serde(default)]
    pub index: usize,

    pub extent: BoundingBox,

    #[serde(default)]
    pub fig_dir: Option<PathBuf>,

    #[serde(default)]
    pub fig_name: Option<String>,
}

fn default_fig_dir() -> PathBuf {
    PathBuf::from(DEFAULT_FIG_DIR)
}

fn default_image_size() -> usize {
    DEFAULT_IMAGE_SIZE
}

impl JobConfig {
    pub fn from_yaml_str(yaml: &str) -> GoesResult<Self> {
        let config: JobConfig = serde_yaml::from_str(yaml)
            .map_err(|e| GoesError::InvalidFormat(format!("job file: {}", e)))?;
        for plot in &config.plots {
            plot.request()?;
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> GoesResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    pub fn plot_options(&self, plot: &PlotJob) -> PlotOptions {
        PlotOptions {
            extent: plot.extent,
            fig_dir: plot.fig_dir.clone().unwrap_or_else(|| self.fig_dir.clone()),
            fig_name: plot.fig_name.clone(),
            image_size: self.image_size,
        }
    }
}

impl PlotJob {
    /// Request for `band`; the second band of a difference shares it apart
    /// from the band number.
    pub fn request(&self) -> GoesResult<ScanRequest> {
        let request = ScanRequest {
            satellite: self.satellite,
            product: self.product,
            band: self.band,
            date: self.date,
            hour: self.hour,
            ten_minute_index: self.index,
        };
        request.validate()?;
        if let Some(minus_band) = self.minus_band {
            ScanRequest {
                band: minus_band,
                ..request.clone()
            }
            .validate()?;
        }
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_btd_command() {
        let args = Args::try_parse_from([
            "goes-btd",
            "btd",
            "--date",
            "2025-03-12",
            "--hour",
            "6",
            "--index",
            "4",
        ])
        .unwrap();

        assert_eq!(args.off_disk_policy, OffDiskPolicy::Invalidate);
        match args.command {
            Command::Btd {
                band1,
                band2,
                scene,
            } => {
                assert_eq!((band1, band2), (13, 7));
                assert_eq!(scene.satellite, Satellite::Goes19);
                assert_eq!(scene.extent.to_extent(), [-73.0, -57.0, 33.0, 46.0]);
                assert_eq!(scene.request(band1).unwrap().ten_minute_index, 4);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_global_flags() {
        let args = Args::try_parse_from([
            "goes-btd",
            "temperature",
            "--band",
            "14",
            "--date",
            "2024-07-01",
            "--hour",
            "18",
            "--extent",
            "-98,-80,18,31",
            "--off-disk-policy",
            "absolute",
            "--log-format",
            "json",
        ])
        .unwrap();

        assert_eq!(args.off_disk_policy, OffDiskPolicy::AbsoluteDiscriminant);
        assert_eq!(args.log_format, LogFormat::Json);
        assert!(matches!(args.command, Command::Temperature { band: 14, .. }));
    }

    #[test]
    fn test_rejects_bad_extent() {
        let result = Args::try_parse_from([
            "goes-btd",
            "temperature",
            "--date",
            "2024-07-01",
            "--hour",
            "18",
            "--extent",
            "-80,-98,18,31",
        ]);
        assert!(result.is_err());
    }
}
