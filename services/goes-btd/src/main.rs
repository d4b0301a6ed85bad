//! goes-btd command line tool.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use goes_btd::config::{Args, Command, JobConfig, LogFormat};
use goes_btd::pipeline::{plot_btd, plot_temperature};
use goes_btd::source::{AwsDataSource, DataSourceFetcher, LocalDataSource};
use netcdf_parser::silence_hdf5_errors;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    let builder = fmt().with_env_filter(filter).with_target(true).with_level(true);
    match args.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }

    silence_hdf5_errors();

    let fetcher = build_fetcher(&args)?;
    let policy = args.off_disk_policy;

    match args.command {
        Command::Temperature { band, scene } => {
            let request = scene.request(band)?;
            let path = plot_temperature(fetcher.as_ref(), &request, &scene.plot_options(), policy)
                .await
                .with_context(|| format!("temperature plot for {}", request))?;
            info!(path = %path.display(), "Done");
        }
        Command::Btd {
            band1,
            band2,
            scene,
        } => {
            let request = scene.request(band1)?;
            let path = plot_btd(fetcher.as_ref(), &request, band2, &scene.plot_options(), policy)
                .await
                .with_context(|| format!("BTD plot for {} minus band {}", request, band2))?;
            info!(path = %path.display(), "Done");
        }
        Command::Job { file } => {
            let job = JobConfig::from_file(&file)
                .with_context(|| format!("reading job file {}", file.display()))?;
            info!(plots = job.plots.len(), "Running job");

            for plot in &job.plots {
                let request = plot.request()?;
                let options = job.plot_options(plot);
                let path = match plot.minus_band {
                    Some(minus_band) => {
                        plot_btd(fetcher.as_ref(), &request, minus_band, &options, policy).await
                    }
                    None => plot_temperature(fetcher.as_ref(), &request, &options, policy).await,
                }
                .with_context(|| format!("job plot for {}", request))?;
                info!(path = %path.display(), "Plot done");
            }
        }
        Command::Srf { input, output } => {
            let path = radiometry::reformat_srf(&input, &output)
                .with_context(|| format!("reformatting {}", input.display()))?;
            info!(path = %path.display(), "Done");
        }
    }

    Ok(())
}

fn build_fetcher(args: &Args) -> Result<Box<dyn DataSourceFetcher>> {
    if let Some(dir) = &args.source_dir {
        info!(root = %dir.display(), "Using local data source");
        return Ok(Box::new(LocalDataSource::new(dir.clone())));
    }

    let mut source = AwsDataSource::new().context("creating S3 client")?;
    if let Some(endpoint) = &args.s3_endpoint {
        source = source.with_endpoint(endpoint.clone());
    }
    Ok(Box::new(source))
}
