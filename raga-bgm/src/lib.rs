//! raga-bgm library interface
//!
//! Audio analysis, MIDI generation and the web front end, exposed for the
//! two binaries and for integration testing.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod runs;
pub mod services;
pub mod utils;

pub use crate::error::{ApiError, ApiResult, BgmError, BgmResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::PipelineReport;
use crate::runs::{remove_run_dirs, RunRegistry, DEFAULT_MAX_RUNS};
use crate::services::Pipeline;

/// MIDI artifact file name
pub const DEFAULT_MIDI_FILE: &str = "generated_bgm.mid";

/// Rendered audio artifact file name
pub const DEFAULT_WAV_FILE: &str = "generated_bgm.wav";

/// Pitch contour plot file name
pub const DEFAULT_PLOT_FILE: &str = "pitch_contour.svg";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Pipeline with its suggestion source
    pub pipeline: Pipeline,
    /// Root directory for per-run artifact directories
    pub output_dir: PathBuf,
    /// Completed runs, bounded; failed runs are never inserted
    pub runs: Arc<RwLock<RunRegistry>>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last error for diagnostic purposes
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(pipeline: Pipeline, output_dir: PathBuf) -> Self {
        Self::with_max_runs(pipeline, output_dir, DEFAULT_MAX_RUNS)
    }

    /// State that keeps at most `max_runs` runs available for download
    pub fn with_max_runs(pipeline: Pipeline, output_dir: PathBuf, max_runs: usize) -> Self {
        Self {
            pipeline,
            output_dir,
            runs: Arc::new(RwLock::new(RunRegistry::new(max_runs))),
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Register a completed run, deleting the directories of evicted runs
    pub async fn register_run(&self, run_id: Uuid, report: PipelineReport) {
        let evicted = self.runs.write().await.insert(run_id, report);
        if !evicted.is_empty() {
            tracing::info!(count = evicted.len(), "Evicting oldest runs");
            remove_run_dirs(&self.output_dir, &evicted).await;
        }
    }

    /// Forget every run and delete its directory
    pub async fn purge_runs(&self) {
        let ids = self.runs.write().await.drain();
        tracing::info!(count = ids.len(), "Purging run directories");
        remove_run_dirs(&self.output_dir, &ids).await;
    }

    /// Record an error for the health endpoint
    pub async fn set_last_error(&self, message: impl Into<String>) {
        *self.last_error.write().await = Some(message.into());
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // UI routes (HTML pages)
        .merge(api::ui_routes())
        // API routes
        .merge(api::compose_routes())
        .merge(api::download_routes())
        .merge(api::health_routes())
        .with_state(state)
}
