//! rig-sim: run the camera rig against simulated tracking
//!
//! Usage:
//!   rig-sim                          # 90 frames with the default config
//!   rig-sim --per-eye --frames 300   # per-eye cameras
//!   rig-sim --toggle-every 30        # switch camera mode every 30 frames
//!   rig-sim --realtime --frame-ms 11 # pace frames with a timer

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use xr_rig_app::SimulationOptions;
use xr_rig_config::{AppConfig, IntegrityPolicy};

#[derive(Parser)]
#[command(name = "rig-sim")]
#[command(about = "Simulate a head-tracked stereo camera rig and print its final state")]
struct Args {
    /// Configuration file (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of frames to simulate
    #[arg(short, long, default_value = "90")]
    frames: u64,

    /// Frame length in milliseconds
    #[arg(long, default_value = "11")]
    frame_ms: u64,

    /// Render each eye with its own camera
    #[arg(long)]
    per_eye: bool,

    /// Synchronize poses on the fixed timestep
    #[arg(long)]
    fixed_update: bool,

    /// Report monoscopic tracking
    #[arg(long)]
    monoscopic: bool,

    /// Toggle between shared and per-eye cameras every N frames
    #[arg(long)]
    toggle_every: Option<u64>,

    /// Pace frames in real time
    #[arg(long)]
    realtime: bool,

    /// Hierarchy normalization policy: every_tick or once
    #[arg(long)]
    policy: Option<IntegrityPolicy>,

    /// Head yaw sway amplitude in radians
    #[arg(long, default_value = "0.2")]
    sway: f32,

    /// Write the effective configuration to this path and exit
    #[arg(long)]
    save_config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let mut config = AppConfig::load_or_default(args.config.as_deref())
        .context("failed to load configuration")?;
    if args.per_eye {
        config.rig.use_per_eye_cameras = true;
    }
    if args.fixed_update {
        config.rig.use_fixed_update_for_tracking = true;
    }
    if let Some(policy) = args.policy {
        config.rig.integrity_policy = policy;
    }

    if let Some(path) = &args.save_config {
        config
            .save(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!("Wrote configuration to {}", path.display());
        return Ok(());
    }

    if args.frame_ms == 0 {
        bail!("--frame-ms must be at least 1");
    }

    let options = SimulationOptions {
        config,
        frames: args.frames,
        frame_duration: Duration::from_millis(args.frame_ms),
        toggle_every: args.toggle_every,
        realtime: args.realtime,
        monoscopic: args.monoscopic,
        sway: args.sway,
    };

    let summary = xr_rig_app::run(options).await?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
