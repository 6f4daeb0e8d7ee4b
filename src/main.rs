use anyhow::{Context, Result};
use atlas_ezo_lib::request::{validate_calibration, validate_compensation};
use atlas_ezo_lib::{
    CalibrationPoint, CompensationFactor, DeviceCatalog, DeviceInfo, DeviceOutputUnits, DeviceSample, ResponseFrame,
};
use bytes::Bytes;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use serde::Serialize;
use std::fs::File;
use std::path::PathBuf;
use std::process;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Decode Atlas Scientific EZO responses and check requests offline.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Device catalog (JSON). Defaults to the built-in EZO profiles.
    #[arg(short, long, global = true)]
    catalog: Option<PathBuf>,
    /// Optional path to a file to write logs to, in addition to the console.
    #[arg(short, long, global = true)]
    log_file: Option<PathBuf>,
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode the response to an `i` (device information) command.
    Info {
        /// Raw response bytes as hex, status byte first.
        hex: String,
        /// I2C address the response was read from.
        #[arg(short, long, default_value_t = 99)]
        address: u8,
    },
    /// Decode the response to an `O,?` (output units) command.
    Output {
        hex: String,
    },
    /// Decode the response to an `R` (read) command.
    Sample {
        hex: String,
        /// Device type whose output layout applies, e.g. `DO`.
        #[arg(short, long)]
        device_type: String,
    },
    /// Check a compensation request (JSON array of factors).
    Compensation {
        #[arg(short, long)]
        device_type: String,
        request: String,
    },
    /// Check a calibration request (JSON object).
    Calibration {
        #[arg(short, long)]
        device_type: String,
        request: String,
    },
    /// List the device types in the catalog.
    Catalog,
}

fn setup_logging(
    log_file_path: Option<PathBuf>,
    verbosity: &Verbosity<InfoLevel>,
) -> Result<Option<WorkerGuard>> {
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    let (file_layer, guard) = if let Some(ref path) = log_file_path {
        let log_file =
            File::create(path).with_context(|| format!("Failed to create log file at: {:?}", path))?;
        let (non_blocking_writer, guard) = tracing_appender::non_blocking(log_file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking_writer)
            .with_ansi(false)
            .with_target(false);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    // INFO by default, DEBUG with -v, TRACE with -vv
    let filter = EnvFilter::builder()
        .with_default_directive(verbosity.tracing_level_filter().into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    if let Some(path) = log_file_path {
        info!("Logging to file: {:?}", path);
    }

    Ok(guard)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = setup_logging(cli.log_file.clone(), &cli.verbose)?;

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        process::exit(1);
    }

    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let catalog = match &cli.catalog {
        Some(path) => DeviceCatalog::from_path(path)
            .with_context(|| format!("Failed to load device catalog from {:?}", path))?,
        None => DeviceCatalog::builtin().context("Built-in device catalog is invalid")?,
    };

    match cli.command {
        Command::Info { hex, address } => {
            let frame = decode_frame(&hex)?;
            print_json(&DeviceInfo::from_frame(&frame, address)?)
        }
        Command::Output { hex } => {
            let frame = decode_frame(&hex)?;
            print_json(&DeviceOutputUnits::from_frame(&frame)?)
        }
        Command::Sample { hex, device_type } => {
            let profile = catalog.profile(&device_type)?;
            let frame = decode_frame(&hex)?;
            print_json(&DeviceSample::from_expected_output(&frame, &profile.output_units)?)
        }
        Command::Compensation { device_type, request } => {
            let supported = catalog.profile(&device_type)?.compensation_factor_set()?;
            let descriptors: Vec<serde_json::Value> =
                serde_json::from_str(&request).context("Compensation request must be a JSON array")?;
            let requested = descriptors
                .iter()
                .map(CompensationFactor::from_descriptor)
                .collect::<Result<Vec<_>, _>>()?;
            print_json(&validate_compensation(&supported, &requested)?)
        }
        Command::Calibration { device_type, request } => {
            let profile = catalog.profile(&device_type)?;
            let descriptor: serde_json::Value =
                serde_json::from_str(&request).context("Calibration request must be a JSON object")?;
            let requested = CalibrationPoint::from_descriptor(&descriptor)?;
            print_json(&validate_calibration(&profile.calibration_points, &requested)?)
        }
        Command::Catalog => {
            for device_type in catalog.device_types() {
                println!("{}", device_type);
            }
            Ok(())
        }
    }
}

/// Decode a hex dump into a frame and refuse responses the device rejected.
fn decode_frame(hex_data: &str) -> Result<ResponseFrame> {
    let raw = hex::decode(hex_data.trim()).context("Response must be hex encoded")?;
    let frame = ResponseFrame::try_from(Bytes::from(raw))?;
    info!(status = %frame.status(), "Decoded response");
    Ok(frame.ensure_accepted()?)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
