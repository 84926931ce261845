//! Arclight - desktop HUD simulator
//!
//! Opens the HUD in an SDL window (or headless) and drives its mode from
//! either a demo script or line commands on stdin:
//!
//! ```text
//! MODE listening
//! speaking Processing Data
//! idle Awaiting Input
//! STATUS
//! STOP
//! ```
//!
//! The render loop runs on the main thread, which SDL requires.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use arclight_core::ModeStateChannel;
use arclight_display::{load_config, DisplayBackend, DisplayController, FrameStats, HeadlessBackend};
use clap::Parser;
use log::{info, warn};

mod control;
mod sim;

use sim::{FrameLimit, SimulatorBackend};

/// Circular HUD simulator
#[derive(Parser, Debug)]
#[command(name = "arclight", version, about)]
struct Args {
    /// TOML configuration file (defaults to the stock HUD)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Cycle through the modes instead of reading commands from stdin
    #[arg(long)]
    demo: bool,

    /// Render without opening a window
    #[arg(long)]
    headless: bool,

    /// Stop after this many frames
    #[arg(long)]
    frames: Option<u64>,

    /// Window scale, overriding the config file
    #[arg(long)]
    scale: Option<u32>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = load_config(args.config.as_deref()).context("failed to load configuration")?;
    if let Some(scale) = args.scale {
        config.window.scale = scale;
    }

    let mut controller = DisplayController::new(&config).context("failed to build HUD")?;
    let channel = Arc::new(ModeStateChannel::new());

    let driver = if args.demo {
        control::spawn_demo(Arc::clone(&channel))
    } else {
        info!("Reading controller commands from stdin");
        control::spawn_stdin(Arc::clone(&channel))
    }
    .context("failed to spawn controller thread")?;

    let stats = if args.headless {
        let backend = HeadlessBackend::new(controller.size());
        run(&mut controller, backend, args.frames, &channel)
    } else {
        let backend = SimulatorBackend::new(controller.window())?;
        run(&mut controller, backend, args.frames, &channel)
    }?;

    channel.request_stop();
    // The stdin reader may be blocked on a read; only the demo is joined
    if args.demo && driver.join().is_err() {
        warn!("Demo thread panicked");
    }

    info!(
        "Rendered {} frames, {} mode changes, {} missed",
        stats.frames, stats.mode_changes, stats.missed
    );
    Ok(())
}

fn run<B: DisplayBackend>(
    controller: &mut DisplayController,
    backend: B,
    frames: Option<u64>,
    channel: &ModeStateChannel,
) -> Result<FrameStats> {
    let stats = match frames {
        Some(limit) => controller.run(FrameLimit::new(backend, limit), channel),
        None => controller.run(backend, channel),
    }?;
    Ok(stats)
}
