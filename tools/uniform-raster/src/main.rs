//! CLI for writing uniform raster fixtures.
//!
//! One thin adapter over `raster_fixture::write_uniform_raster`: parse
//! arguments, write the file, print a confirmation line.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use raster_fixture::{write_uniform_raster, SampleType};

#[derive(Parser, Debug)]
#[command(name = "uniform-raster")]
#[command(about = "Write a single-pixel GeoTIFF covering the whole globe")]
#[command(allow_negative_numbers = true)]
struct Args {
    /// Value stored in the raster's one pixel
    value: f64,

    /// Destination GeoTIFF path (parent directory must exist)
    output_path: PathBuf,

    /// Sample encoding for the raster
    #[arg(long, default_value = "float32")]
    dtype: String,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let sample_type: SampleType = args.dtype.parse()?;
    debug!(dtype = %sample_type, "parsed sample type");

    let raster = write_uniform_raster(&args.output_path, args.value, sample_type)?;

    println!(
        "Created uniform raster with value {} at: {}",
        raster.value,
        raster.path.display()
    );
    Ok(())
}
