// Decision log: one JSON line per engine call, written off the request path
//
// Each line carries the snapshot the engine saw and the direction it chose, so
// the replay tool can feed the same snapshot back and compare.

use log::error;
use serde::Serialize;
use std::sync::Arc;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::engine::{Decision, Strategy};
use crate::types::SnapshotRequest;

/// Written for an undecided call
pub const NO_MOVE: &str = "none";

#[derive(Debug, Serialize)]
struct DebugLogEntry {
    turn: u64,
    chosen_move: String,
    strategy: Strategy,
    compute_time_us: u64,
    snapshot: SnapshotRequest,
    timestamp: String,
}

impl DebugLogEntry {
    fn new(turn: u64, snapshot: SnapshotRequest, decision: &Decision) -> Self {
        DebugLogEntry {
            turn,
            chosen_move: decision
                .direction
                .map_or(NO_MOVE, |dir| dir.as_str())
                .to_string(),
            strategy: decision.strategy,
            compute_time_us: decision.compute_time_us,
            snapshot,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Shared handle to the log file; clones write to the same file
#[derive(Clone)]
pub struct DebugLogger {
    file: Arc<Mutex<Option<File>>>,
    enabled: bool,
}

impl DebugLogger {
    /// Opens (and truncates) the log file when enabled. A file that cannot be
    /// created leaves the logger disabled.
    pub async fn new(enabled: bool, log_file_path: &str) -> Self {
        if !enabled {
            return Self::disabled();
        }

        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_file_path)
            .await
        {
            Ok(file) => {
                log::info!("Decision logging enabled: {}", log_file_path);
                DebugLogger {
                    file: Arc::new(Mutex::new(Some(file))),
                    enabled: true,
                }
            }
            Err(e) => {
                error!("Failed to create decision log '{}': {}", log_file_path, e);
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        DebugLogger {
            file: Arc::new(Mutex::new(None)),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Queues one entry on a background task and returns immediately
    pub fn log_decision(&self, turn: u64, snapshot: SnapshotRequest, decision: &Decision) {
        if !self.enabled {
            return;
        }

        let entry = DebugLogEntry::new(turn, snapshot, decision);
        let file_handle = self.file.clone();

        tokio::spawn(async move {
            Self::write_entry(file_handle, entry).await;
        });
    }

    /// Writes one entry and waits for it to reach the file
    pub async fn log_decision_now(&self, turn: u64, snapshot: SnapshotRequest, decision: &Decision) {
        if !self.enabled {
            return;
        }
        let entry = DebugLogEntry::new(turn, snapshot, decision);
        Self::write_entry(self.file.clone(), entry).await;
    }

    async fn write_entry(file_handle: Arc<Mutex<Option<File>>>, entry: DebugLogEntry) {
        let mut file_guard = file_handle.lock().await;
        let Some(file) = file_guard.as_mut() else {
            return;
        };

        let json_line = match serde_json::to_string(&entry) {
            Ok(line) => line,
            Err(e) => {
                error!("Failed to serialize decision log entry: {}", e);
                return;
            }
        };

        if let Err(e) = file.write_all(format!("{}\n", json_line).as_bytes()).await {
            error!("Failed to write decision log entry: {}", e);
        } else if let Err(e) = file.flush().await {
            error!("Failed to flush decision log: {}", e);
        }
    }
}
