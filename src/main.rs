//! gesture-volume: hand-gesture volume and mute controller
//!
//! Consumes per-frame hand landmarks from an external detector and drives
//! an audio sink:
//! - Pinch distance between thumb and index tips sets the volume
//! - A fist held for a full streak of frames toggles mute, restoring the
//!   pre-mute volume on unmute
//! - A read-only IPC socket exposes status and control events to overlays

mod audio;
mod config;
mod events;
mod gesture;
mod ipc;
mod landmarks;
mod lifecycle;
mod session;
mod source;
mod state;

use anyhow::{Context, Result};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::audio::SoftwareMixer;
use crate::config::Config;
use crate::events::ControlEvent;
use crate::ipc::Server;
use crate::lifecycle::ShutdownSignal;
use crate::session::Session;
use crate::source::{FrameRecord, FrameSource};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "gesture-volume starting"
    );

    // Load configuration
    let config = Config::load()?;
    config.ensure_dirs()?;
    info!(
        ?config.socket_path,
        input = %config.input,
        frame_width = config.frame_size.width,
        frame_height = config.frame_size.height,
        "configuration loaded"
    );

    let shutdown = ShutdownSignal::new();

    // Session -> IPC server (control events for subscribed clients)
    let (event_tx, _event_rx) = broadcast::channel::<ControlEvent>(64);

    // Without a volume range nothing can be mapped, so this is fatal
    let mixer = SoftwareMixer::new(config.mixer_range, config.initial_volume)
        .context("failed to create software mixer")?;
    let mut session = Session::start(mixer, event_tx.clone()).context("audio sink unavailable")?;

    // Frame source -> frame loop
    let (frame_tx, mut frame_rx) = mpsc::channel::<FrameRecord>(32);
    let source = FrameSource::new(config.input.clone(), config.frame_interval, frame_tx);
    source.start().context("failed to start frame source")?;

    let server = Server::new(&config.socket_path, event_tx.clone())?;

    info!("daemon initialized, entering main loop");

    tokio::select! {
        // Process frames strictly in arrival order
        _ = async {
            while let Some(record) = frame_rx.recv().await {
                match session.process_record(record, config.frame_size) {
                    Ok(report) => {
                        if !report.failed.is_empty() {
                            debug!(failed = report.failed.len(), "frame had rejected commands");
                        }
                        server.set_status(&session.snapshot()).await;
                    }
                    Err(e) => {
                        warn!(error = %e, "skipping malformed hand observation");
                    }
                }
            }
        } => {
            info!("frame input exhausted");
        }

        // Run the IPC server (accepts client connections)
        result = server.run() => {
            if let Err(e) = result {
                error!(?e, "IPC server error");
            }
        }

        // Wait for shutdown signal
        reason = shutdown.wait() => {
            info!(%reason, "shutdown signal received");
        }
    }

    // Cleanup
    info!("shutting down...");

    if source.is_running() {
        source.stop();
    }
    server.shutdown().await;

    let snapshot = session.snapshot();
    info!(
        frames = snapshot.frames_processed,
        mode = %snapshot.mode,
        level_db = session.sink().level_db(),
        muted = session.sink().is_muted(),
        "gesture-volume stopped"
    );

    Ok(())
}
