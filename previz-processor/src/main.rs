//! previz render worker — entry point.
//!
//! ```text
//! previz-processor                    Connect using the default config
//! previz-processor --config <path>    Load a custom config TOML
//! previz-processor --gen-config       Write the default config to stdout
//! previz-processor --model-dir <dir>  Prepend an asset search directory
//! ```
//!
//! Two long-lived execution contexts: the session task runs the
//! blocking receive loop against the authoring tool, and the main task
//! drives the render tick. They share only the update queue and the
//! frame store. When the session task finishes (peer disconnect or
//! protocol error) the whole process exits rather than keep rendering
//! against a dead link.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use previz_core::{BridgeSession, FrameStore, OffscreenSurfaces, SceneSync, connect_with_retry, update_channel};
use previz_processor::config::ProcessorConfig;
use previz_processor::engine::{SoftwareScene, SoftwareSurface};

// ── CLI ──────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "previz-processor", about = "previz render worker")]
struct Cli {
    /// Path to configuration TOML file.
    #[arg(short, long, default_value = "previz-processor.toml")]
    config: PathBuf,

    /// Print the default configuration to stdout and exit.
    #[arg(long)]
    gen_config: bool,

    /// Additional asset search directories (prepended to the config's).
    #[arg(long = "model-dir")]
    model_dirs: Vec<PathBuf>,
}

// ── Main ─────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // --gen-config: dump defaults and exit.
    if cli.gen_config {
        let text = toml::to_string_pretty(&ProcessorConfig::default())?;
        println!("{text}");
        return Ok(());
    }

    // Load config.
    let config = ProcessorConfig::load(&cli.config);

    // Init tracing.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("previz-processor v{}", env!("CARGO_PKG_VERSION"));
    info!("authoring tool: {}", config.peer_addr());
    info!("target FPS: {}", config.render.target_fps);

    // Dial the authoring tool. Exhausting the retry budget is fatal.
    let backoff = Duration::from_millis(config.network.connect_backoff_ms);
    let stream = match connect_with_retry(
        &config.peer_addr(),
        config.network.connect_attempts,
        backoff,
    )
    .await
    {
        Ok(stream) => stream,
        Err(e) => {
            error!(error = %e, "giving up");
            std::process::exit(1);
        }
    };

    // Shared state between the session task and the render tick: the
    // update queue one way, the frame store the other. Nothing else.
    let (update_tx, update_rx) = update_channel();
    let frames = FrameStore::new();

    let mut search_paths = cli.model_dirs;
    search_paths.extend(config.assets.search_paths.iter().map(PathBuf::from));
    let scene = SoftwareScene::new(search_paths);
    let surfaces = OffscreenSurfaces::new(SoftwareSurface::new(), 1, 1);
    let mut sync = SceneSync::new(update_rx, scene, surfaces, frames.clone());

    let session = BridgeSession::new(stream, update_tx, frames);
    let mut session_task = tokio::spawn(session.run());

    // Render tick. Late ticks are skipped, not replayed in a burst.
    let period = Duration::from_secs_f64(1.0 / f64::from(config.render.target_fps.max(1)));
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                sync.run_tick();
            }
            joined = &mut session_task => {
                match joined {
                    Ok(Ok(())) => {
                        info!("session closed by peer, shutting down");
                        std::process::exit(0);
                    }
                    Ok(Err(e)) => {
                        error!(error = %e, "session failed, shutting down");
                        std::process::exit(1);
                    }
                    Err(e) => {
                        error!(error = %e, "session task panicked, shutting down");
                        std::process::exit(1);
                    }
                }
            }
            _ = &mut ctrl_c => {
                info!("Ctrl-C received, shutting down");
                std::process::exit(0);
            }
        }
    }
}
