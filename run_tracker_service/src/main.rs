use std::{path::PathBuf, time::Duration};

use anyhow::Context;
use clap::{Parser, Subcommand};
use geo_types::Point;
use run_tracker_service::{
    SessionManager, gpx_util,
    location_request::LocationRequest,
    location_source::{GpxLocationSource, LocationSource, SimulatedLocationSource, run_location_updates},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(about = "Drive a tracking session from a location source")]
struct Cli {
    /// Directory for the live session buffer
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Track a simulated run and print the resulting summary
    Simulate {
        /// Number of fixes to produce
        #[arg(long, default_value_t = 60)]
        steps: usize,
        /// Seconds between fixes
        #[arg(long, default_value_t = 1.0)]
        interval: f64,
        /// Starting latitude
        #[arg(long, default_value_t = 56.1629)]
        lat: f64,
        /// Starting longitude
        #[arg(long, default_value_t = 10.2039)]
        lon: f64,
        /// Write the recorded track to this GPX file
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Replay a GPX file through a tracking session
    Replay {
        gpx: PathBuf,
        /// Write the re-recorded track to this GPX file
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=trace", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let manager = SessionManager::start(cli.data_dir.clone()).await?;

    let recovered = manager.recovered_fixes().await;
    if !recovered.is_empty() {
        println!("Found {} fixes from an unfinished run in {:?}", recovered.len(), cli.data_dir);
    }

    match cli.command {
        Command::Simulate { steps, interval, lat, lon, out } => {
            let request = LocationRequest::with_interval(Duration::from_secs_f64(interval));
            let mut source = SimulatedLocationSource::new(Point::new(lon, lat), steps, request);
            track(&manager, &mut source, out).await
        }
        Command::Replay { gpx, out } => {
            let gpx = gpx.to_str().context("GPX path is not valid UTF-8")?;
            let mut source = GpxLocationSource::open(gpx)?;
            track(&manager, &mut source, out).await
        }
    }
}

async fn track<S: LocationSource>(
    manager: &SessionManager,
    source: &mut S,
    out: Option<PathBuf>,
) -> anyhow::Result<()> {
    manager.start_tracking().await?;
    let delivered = run_location_updates(manager, source).await?;
    tracing::info!("Delivered {} fixes", delivered);

    let started_at = manager.started_at().await;
    let summary = manager.stop_tracking().await?;
    let path = manager.path().await;

    println!("Recorded {} fixes", path.len());
    println!("Start:  {:.5}, {:.5}", summary.start.latitude(), summary.start.longitude());
    println!("Finish: {:.5}, {:.5}", summary.end.latitude(), summary.end.longitude());
    if let Some(rect) = manager.bounding_region().await.to_rect() {
        println!(
            "Bounds: lat [{:.5}, {:.5}] lon [{:.5}, {:.5}]",
            rect.min().y,
            rect.max().y,
            rect.min().x,
            rect.max().x
        );
    }

    if let Some(out) = out {
        let out = out.to_str().context("Output path is not valid UTF-8")?;
        gpx_util::write_gpx(out, "Recorded run", started_at, &path)?;
        println!("Wrote {}", out);
    }

    Ok(())
}
