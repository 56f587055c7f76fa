//! Money clock entry point.
//!
//! Runs an analog clock face next to a work timer that shows what the
//! day's work has earned so far, in one cooperative event loop.

mod app;
mod ascii;
mod signals;

use anyhow::{Context, Result};
use clap::Parser;
use clock_common::config::AppConfig;
use clock_common::time::{LocalTimeSource, TimeSource};
use clock_runtime::driver::RealtimeDriver;
use clock_runtime::scheduler::EventLoop;
use money_timer::entry::start_offset;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

use crate::app::App;
use crate::signals::SignalHandler;

/// Money clock command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "money-clock",
    about = "Analog clock with a running tally of the day's earnings",
    version,
    long_about = None
)]
struct Args {
    /// Path to a configuration file (TOML).
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    /// Time work started today (hh:mm or h:mm). Omit to start now.
    #[arg(long, short = 's', value_name = "HH:MM")]
    start: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,

    /// Do not draw to the terminal.
    #[arg(long)]
    no_display: bool,

    /// Maximum face refreshes to run (0 = until interrupted).
    #[arg(long, default_value = "0")]
    max_ticks: u64,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level);

    info!(version = env!("CARGO_PKG_VERSION"), "Starting money clock");

    let mut config = load_config(&args)?;
    if args.no_display {
        config.display.enabled = false;
    }

    info!(
        size = config.face.size,
        smooth = config.face.smooth,
        update = ?config.timer.update_interval,
        "Configuration loaded"
    );

    let signals = SignalHandler::new().context("Failed to set up signal handlers")?;

    run(&config, &args, signals)
}

/// Initialize logging with the specified log level.
fn init_logging(level: &str) {
    let filter = format!(
        "money_clock={level},clock_app={level},clock_runtime={level},clock_face={level},money_timer={level},clock_common={level}"
    );

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&filter)),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Load configuration from file or use defaults.
///
/// Resolution priority (first existing file wins):
/// 1. Command-line `--config` argument
/// 2. `MONEY_CLOCK_CONFIG` environment variable
/// 3. `config/default.toml` (local development)
/// 4. Built-in defaults
fn load_config(args: &Args) -> Result<AppConfig> {
    if let Some(config_path) = &args.config {
        info!(?config_path, "Loading config from command-line argument");
        return AppConfig::from_file(config_path)
            .with_context(|| format!("Failed to load config from {config_path:?}"));
    }

    if let Ok(env_path) = std::env::var("MONEY_CLOCK_CONFIG") {
        let config_path = PathBuf::from(&env_path);
        if config_path.exists() {
            info!(?config_path, "Loading config from MONEY_CLOCK_CONFIG");
            return AppConfig::from_file(&config_path).with_context(|| {
                format!("Failed to load config from MONEY_CLOCK_CONFIG={env_path:?}")
            });
        }
        warn!(
            path = %env_path,
            "MONEY_CLOCK_CONFIG set but file does not exist, checking other locations"
        );
    }

    let local_path = PathBuf::from("config/default.toml");
    if local_path.exists() {
        info!(?local_path, "Loading config from local path");
        return AppConfig::from_file(&local_path)
            .with_context(|| format!("Failed to load config from {local_path:?}"));
    }

    info!("No config file found, using built-in defaults");
    Ok(AppConfig::default())
}

/// Set up the face and session, then drive them until shutdown.
fn run(config: &AppConfig, args: &Args, signals: SignalHandler) -> Result<()> {
    let time = LocalTimeSource;
    let elapsed = start_offset(args.start.as_deref().unwrap_or(""), time.sample())
        .context("Invalid --start time")?;

    let mut timers = EventLoop::new();
    let mut app = App::new(config, time, signals)?.max_ticks(args.max_ticks);
    app.start(elapsed, &mut timers)?;

    let driver = RealtimeDriver::new().poll_interval(Duration::from_millis(50));
    let summary = driver.run(&mut timers, &mut app);
    info!(?summary.reason, dispatched = summary.dispatched, "Event loop finished");

    app.shutdown(&mut timers);
    Ok(())
}
