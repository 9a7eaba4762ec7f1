//! ssdfan Daemon
//!
//! Drives a GPU fan from the temperature of an NVMe SSD through the Linux
//! hwmon interface.
//!
//! # Lifecycle
//!
//! 1. Locate the GPU and SSD hwmon directories.
//! 2. Read the PWM range, remember the current fan mode, switch the fan to
//!    manual mode and command the PWM for the current temperature.
//! 3. Tick on a fixed interval, moving the PWM toward the temperature target
//!    by at most `max_step` per tick.
//! 4. On SIGTERM, SIGINT, SIGQUIT or SIGHUP stop the loop and write the
//!    original fan mode back.
//!
//! Any failure before step 3 is fatal and exits with a nonzero status.

mod config;
mod control;
mod shutdown;
#[cfg(test)]
mod test_utils;

use anyhow::{Context, Result};
use clap::Parser;
use control::FanLoop;
use shutdown::ShutdownSignals;
use ssdfan_core::{default_config_path, StaticConfig};
use ssdfan_hardware::{locate_devices, FanController, SysfsAttributes, TemperatureSensor};
use std::path::PathBuf;
use tracing::{error, info};

/// ssdfan controller daemon
#[derive(Parser, Debug)]
#[command(name = "ssdfand")]
#[command(version, about = "Drive a GPU fan from NVMe SSD temperature", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    init_tracing(args.verbose);

    if let Err(e) = run(args).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    info!("ssdfand starting...");

    // Determine config path: CLI flag > env var > default
    let config_path = args.config.unwrap_or_else(|| {
        std::env::var("SSDFAN_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_config_path())
    });
    info!("Configuration file: {}", config_path.display());

    let config = config::load_config(&config_path)
        .await
        .context("Failed to load configuration")?;

    let signals = ShutdownSignals::install().context("Failed to install signal handlers")?;

    let fan_loop = start(&config).await?;
    info!("Controller ready!");

    shutdown::run_until_shutdown(
        fan_loop,
        config.interval(),
        config.shutdown.restore_mode,
        signals.recv(),
    )
    .await;

    info!("ssdfand shutdown complete");
    Ok(())
}

/// Discover the devices and take control of the fan
async fn start(config: &StaticConfig) -> Result<FanLoop<SysfsAttributes, SysfsAttributes>> {
    let paths = locate_devices(&config.devices)
        .await
        .context("Device discovery failed")?;
    info!("GPU path: {}", paths.gpu.display());
    info!("SSD path: {}", paths.ssd.display());

    let range = config.temperature_range()?;
    info!(
        "Temperature range: {}..{} millidegrees, max step {} every {}s",
        range.min(),
        range.max(),
        config.control.max_step,
        config.control.interval_secs
    );

    FanLoop::initialize(
        FanController::new(SysfsAttributes::new(paths.gpu)),
        TemperatureSensor::new(SysfsAttributes::new(paths.ssd)),
        range,
        config.control.max_step,
    )
    .await
    .context("Failed to take control of the fan")
}

/// Initialize tracing subscriber for logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
