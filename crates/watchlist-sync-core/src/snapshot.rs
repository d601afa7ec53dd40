use anyhow::{anyhow, Result};
use std::path::PathBuf;
use tracing::{debug, warn};
use watchlist_sync_models::WatchlistEntry;

/// Durable slot for the local snapshot: one JSON array in one file, read
/// once at startup and rewritten whole on every mutation (last-write-wins,
/// no partial-entry persistence).
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Load the persisted snapshot. A missing file is an empty list; a
    /// corrupt file is logged, deleted, and treated as empty.
    pub fn load(&self) -> Vec<WatchlistEntry> {
        if !self.path.exists() {
            debug!("No snapshot file at {:?}, starting empty", self.path);
            return Vec::new();
        }

        match std::fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str::<Vec<WatchlistEntry>>(&content) {
                Ok(entries) => {
                    debug!("Loaded snapshot ({} entries)", entries.len());
                    entries
                }
                Err(e) => {
                    warn!(
                        "Snapshot corruption detected at {:?}: {}. Deleting corrupted file.",
                        self.path, e
                    );
                    if let Err(rm_err) = std::fs::remove_file(&self.path) {
                        warn!("Failed to delete corrupted snapshot file: {}", rm_err);
                    }
                    Vec::new()
                }
            },
            Err(e) => {
                warn!("Failed to read snapshot file {:?}: {}", self.path, e);
                Vec::new()
            }
        }
    }

    /// Overwrite the slot with the full current snapshot.
    pub fn flush(&self, entries: &[WatchlistEntry]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| anyhow!("Failed to serialize snapshot: {}", e))?;
        std::fs::write(&self.path, json)
            .map_err(|e| anyhow!("Failed to write snapshot to {:?}: {}", self.path, e))?;
        debug!("Snapshot flushed ({} entries)", entries.len());
        Ok(())
    }
}
