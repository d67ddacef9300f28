//! Registry of completed web runs
//!
//! Holds at most `capacity` runs. Registering past capacity evicts the
//! oldest run; the caller removes its directory. Run directories are named
//! by run id directly under the output directory.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::models::PipelineReport;

/// Default number of runs kept for download
pub const DEFAULT_MAX_RUNS: usize = 32;

/// Bounded, insertion-ordered run store
#[derive(Debug)]
pub struct RunRegistry {
    capacity: usize,
    order: VecDeque<Uuid>,
    reports: HashMap<Uuid, PipelineReport>,
}

impl RunRegistry {
    /// `capacity` is clamped to at least one run
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            order: VecDeque::new(),
            reports: HashMap::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, id: &Uuid) -> Option<&PipelineReport> {
        self.reports.get(id)
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Register a run, returning the ids evicted to stay within capacity
    pub fn insert(&mut self, id: Uuid, report: PipelineReport) -> Vec<Uuid> {
        if self.reports.insert(id, report).is_none() {
            self.order.push_back(id);
        }

        let mut evicted = Vec::new();
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.reports.remove(&oldest);
                evicted.push(oldest);
            }
        }
        evicted
    }

    /// Remove every run, returning their ids oldest first
    pub fn drain(&mut self) -> Vec<Uuid> {
        self.reports.clear();
        self.order.drain(..).collect()
    }
}

/// Directory holding the artifacts of run `id`
pub fn run_dir(output_dir: &Path, id: Uuid) -> PathBuf {
    output_dir.join(id.to_string())
}

/// Delete run directories; failures are logged, not returned
pub async fn remove_run_dirs(output_dir: &Path, ids: &[Uuid]) {
    for id in ids {
        let dir = run_dir(output_dir, *id);
        match tokio::fs::remove_dir_all(&dir).await {
            Ok(()) => tracing::debug!(run_id = %id, "Run directory removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(run_id = %id, error = %e, "Failed to remove run directory")
            }
        }
    }
}

/// Remove run directories left behind by an earlier process
///
/// Only subdirectories whose name is a run id are touched. Returns how many
/// were removed.
pub async fn remove_stale_run_dirs(output_dir: &Path) -> std::io::Result<usize> {
    let mut entries = match tokio::fs::read_dir(output_dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e),
    };

    let mut stale = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_dir() {
            continue;
        }
        if let Some(id) = entry.file_name().to_str().and_then(|n| Uuid::parse_str(n).ok()) {
            stale.push(id);
        }
    }

    remove_run_dirs(output_dir, &stale).await;
    if !stale.is_empty() {
        tracing::info!(count = stale.len(), "Removed stale run directories");
    }
    Ok(stale.len())
}
