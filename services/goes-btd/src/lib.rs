//! Brightness temperature and BTD maps from GOES-R ABI L1b radiances.
//!
//! - [`source`]: listing and fetching L1b files (NOAA S3 buckets or a
//!   local mirror)
//! - [`scene`]: a loaded band with its memoised lat/lon grid
//! - [`pipeline`]: fetch, subset, calibrate and render
//! - [`config`]: command line and YAML job files

pub mod config;
pub mod pipeline;
pub mod scene;
pub mod source;

pub use config::{Args, Command, JobConfig, LogFormat, PlotJob, PlotOptions, SceneArgs};
pub use pipeline::{load_scene, plot_btd, plot_temperature, render_btd, render_temperature};
pub use scene::Scene;
pub use source::{select_file, AwsDataSource, DataSourceFetcher, LocalDataSource, RemoteFile};
