//! raga-bgm-web - interactive web front end
//!
//! Serves the upload form, runs the pipeline per request and keeps the
//! most recent runs' artifacts available for download. Run directories
//! are removed on eviction, at shutdown, and (when left over from an
//! earlier process) at startup.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use raga_bgm::config::BgmConfig;
use raga_bgm::runs::remove_stale_run_dirs;
use raga_bgm::services::{GeminiClient, Pipeline};
use raga_bgm::{build_router, AppState};

/// Command-line arguments for raga-bgm-web
#[derive(Parser, Debug)]
#[command(name = "raga-bgm-web")]
#[command(about = "Web front end for raga background music generation")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides config)
    #[arg(short, long, env = "RAGA_BGM_PORT")]
    port: Option<u16>,

    /// Directory for per-run artifacts (overrides config)
    #[arg(short, long, env = "RAGA_BGM_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Completed runs kept for download (overrides config)
    #[arg(long, env = "RAGA_BGM_MAX_RUNS")]
    max_runs: Option<usize>,

    /// TOML config file (default: <config_dir>/raga-bgm/config.toml)
    #[arg(short, long, env = "RAGA_BGM_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml_config = raga_common::config::load_config(args.config.as_deref())
        .context("Failed to load configuration")?;
    raga_common::logging::init_logging(&toml_config.logging)
        .context("Failed to initialize logging")?;

    let mut config = BgmConfig::resolve(toml_config).context("Invalid configuration")?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(output_dir) = args.output_dir {
        config.output_dir = output_dir;
    }
    if let Some(max_runs) = args.max_runs {
        config.max_runs = max_runs;
    }

    info!(
        "Starting raga-bgm-web v{} ({}) on port {}",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        config.port
    );
    info!("Output directory: {}", config.output_dir.display());

    tokio::fs::create_dir_all(&config.output_dir)
        .await
        .with_context(|| format!("Failed to create {}", config.output_dir.display()))?;
    remove_stale_run_dirs(&config.output_dir)
        .await
        .context("Failed to clean output directory")?;

    let client = GeminiClient::new(config.gemini.clone())
        .context("Failed to create Gemini client")?;
    let state = AppState::with_max_runs(
        Pipeline::new(Arc::new(client)),
        config.output_dir.clone(),
        config.max_runs,
    );
    let app = build_router(state.clone()).layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    state.purge_runs().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
