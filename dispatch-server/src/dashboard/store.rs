//! Snapshot persistence.
//!
//! The store retains the latest [`DashboardSnapshot`] — one logical
//! key, process-wide — and writes it through to a JSON file so the
//! dashboard survives a restart. A failed write degrades the dashboard
//! but never fails the optimization that produced the snapshot; the
//! caller decides whether to log or ignore the error.

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::json;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::projection::DashboardSnapshot;

/// Errors from reading or writing the state file.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The state file could not be read or written.
    #[error("state file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The state file held something other than a snapshot.
    #[error("state file is not valid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Thread-safe holder of the latest dashboard snapshot.
///
/// Cheap to clone; all clones share the same state.
#[derive(Clone)]
pub struct SnapshotStore {
    inner: Arc<RwLock<Option<DashboardSnapshot>>>,
    path: PathBuf,
}

impl SnapshotStore {
    /// Open the store, loading any snapshot persisted at `path`.
    ///
    /// A missing file is the normal first-boot case. An unreadable or
    /// corrupt file is logged and the store starts empty; the next
    /// update overwrites it.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let initial = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<DashboardSnapshot>(&bytes) {
                Ok(snapshot) => {
                    debug!(path = %path.display(), "loaded persisted dashboard snapshot");
                    Some(snapshot)
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "ignoring corrupt state file");
                    None
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "state file unreadable, starting empty");
                None
            }
        };
        Self {
            inner: Arc::new(RwLock::new(initial)),
            path,
        }
    }

    /// Replace the retained snapshot and write it through to disk.
    ///
    /// The in-memory state is updated even when the write fails, so
    /// readers always see the latest computed snapshot.
    pub async fn update(&self, snapshot: DashboardSnapshot) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(&snapshot)?;
        {
            let mut guard = self.inner.write().await;
            *guard = Some(snapshot);
        }
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }

    /// The currently retained snapshot, if any run has completed.
    pub async fn snapshot(&self) -> Option<DashboardSnapshot> {
        self.inner.read().await.clone()
    }

    /// One named dashboard section as JSON.
    ///
    /// Unknown section names and an empty store both yield an empty
    /// array, matching what the dashboard expects before the first run.
    pub async fn section(&self, name: &str) -> serde_json::Value {
        let guard = self.inner.read().await;
        let Some(snapshot) = guard.as_ref() else {
            return json!([]);
        };
        let section = match name {
            "currentDelays" => serde_json::to_value(&snapshot.current_delays),
            "trainQueue" => serde_json::to_value(&snapshot.train_queue),
            "platformStatus" => serde_json::to_value(&snapshot.platform_status),
            "predictedConflicts" => serde_json::to_value(&snapshot.predicted_conflicts),
            "trainTypeData" => serde_json::to_value(&snapshot.train_type_data),
            "auditData" => serde_json::to_value(&snapshot.audit_data),
            _ => return json!([]),
        };
        section.unwrap_or_else(|e| {
            warn!(section = name, error = %e, "failed to serialize dashboard section");
            json!([])
        })
    }
}
