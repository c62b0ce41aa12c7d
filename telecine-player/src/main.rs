//! Telecine - video on an ST7789 SPI panel
//!
//! Decodes a file, stream, capture device or video server playlist with
//! ffmpeg and pushes every frame to a 240x320 ST7789 TFT over spidev,
//! looping finite sources and reconnecting to failed ones forever.

mod config;
mod hardware;
mod logging;
mod scale;
mod source;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use telecine_core::config::PlayerConfig;
use telecine_core::playback::{Player, PlayerSettings};
use telecine_core::traits::FrameSink;
use telecine_hal_linux::SystemClock;
use tracing::{debug, info, warn};

use crate::config::{apply_env, load_file, LoadError, DEFAULT_CONFIG_PATH};
use crate::hardware::Hardware;
use crate::scale::NearestScaler;
use crate::source::{FfmpegOptions, Source};

#[derive(Parser, Debug)]
#[command(name = "telecine-player")]
#[command(about = "Stream video onto an ST7789 SPI panel", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Play this file, URL or capture device instead of the configured source
    #[arg(short, long, value_name = "LOCATOR")]
    source: Option<String>,

    /// Log filter, e.g. `debug` or `telecine_drivers=trace` (default: RUST_LOG, then info)
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,

    /// Validate the configuration and exit
    #[arg(long)]
    check_config: bool,
}

/// File, then environment, then flags
fn load_config(cli: &Cli) -> Result<PlayerConfig, LoadError> {
    let (path, explicit) = match &cli.config {
        Some(path) => (path.clone(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
    };

    let mut config = load_file(&path, explicit)?;
    apply_env(&mut config, |var| std::env::var(var).ok())?;

    if let Some(locator) = &cli.source {
        config.source.locator = Some(locator.clone());
        config.source.server_url = None;
    }

    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_level.as_deref())?;

    let config = load_config(&cli).context("loading configuration")?;
    debug!(?config, "configuration");

    if cli.check_config {
        info!("configuration valid");
        return Ok(());
    }

    run(&config)
}

fn run(config: &PlayerConfig) -> Result<()> {
    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = Arc::clone(&stop);
        ctrlc::set_handler(move || {
            info!("stop requested");
            stop.store(true, Ordering::Relaxed);
        })
        .context("installing signal handler")?;
    }

    let options = FfmpegOptions {
        prescale: config
            .source
            .prescale
            .then_some((config.panel.width, config.panel.height)),
    };
    let source = Source::from_config(&config.source, options);

    let mut hw = Hardware::open(config).context("opening hardware")?;
    hw.panel
        .initialize(config.panel)
        .map_err(|e| anyhow!("panel initialization failed: {}", e))?;

    if let Err(e) = hw.panel.fill(config.playback.clear_color) {
        warn!(error = %e, "failed to clear panel");
    }
    hw.set_backlight(true);

    info!(
        source = %source.describe(),
        width = config.panel.width,
        height = config.panel.height,
        orientation = config.panel.orientation.index(),
        "telecine ready"
    );

    let settings = PlayerSettings::from_config(&config.playback);
    let stats = Player::new(source, &mut hw.panel, NearestScaler, SystemClock::new(), settings, &stop).run();

    hw.shutdown();
    info!(%stats, "exiting");
    Ok(())
}
