//! Durable session snapshot on disk

use crate::error::{JobOptimizerError, Result};
use crate::session::state::SessionState;
use log::{debug, warn};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// Reads and writes the JSON snapshot that lets a session survive a restart.
/// Writes go through a temp file in the same directory so a crash mid-write
/// never leaves a half-written snapshot behind.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the snapshot if one exists and parses. A missing, unreadable,
    /// or corrupt snapshot is not fatal: the session simply starts fresh.
    pub fn load(&self) -> Option<SessionState> {
        if !self.path.exists() {
            debug!("No session snapshot at {}", self.path.display());
            return None;
        }

        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(
                    "Could not read session snapshot {}: {}",
                    self.path.display(),
                    e
                );
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(state) => {
                debug!("Restored session snapshot from {}", self.path.display());
                Some(state)
            }
            Err(e) => {
                warn!(
                    "Ignoring corrupt session snapshot {}: {}",
                    self.path.display(),
                    e
                );
                None
            }
        }
    }

    pub fn save(&self, state: &SessionState) -> Result<()> {
        let parent = self.path.parent().ok_or_else(|| {
            JobOptimizerError::SessionStorage(format!(
                "Session path has no parent directory: {}",
                self.path.display()
            ))
        })?;
        fs::create_dir_all(parent)?;

        let json = serde_json::to_string_pretty(state)?;

        let mut tmp = NamedTempFile::new_in(parent).map_err(|e| {
            JobOptimizerError::SessionStorage(format!("Failed to create temp snapshot: {}", e))
        })?;
        tmp.write_all(json.as_bytes()).map_err(|e| {
            JobOptimizerError::SessionStorage(format!("Failed to write snapshot: {}", e))
        })?;
        tmp.persist(&self.path).map_err(|e| {
            JobOptimizerError::SessionStorage(format!("Failed to persist snapshot: {}", e))
        })?;

        debug!("Saved session snapshot to {}", self.path.display());
        Ok(())
    }

    /// Removes the snapshot. Already absent counts as cleared.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Removed session snapshot {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::Operation;
    use serde_json::json;

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));

        let mut state = SessionState::default();
        state.job_description = "Backend engineer, Rust".to_string();
        state.set_result(Operation::Optimize, json!({"suggestions": ["tighten summary"]}));
        store.save(&state).unwrap();

        let restored = store.load().unwrap();
        assert_eq!(restored.job_description, "Backend engineer, Rust");
        assert!(restored.result_for(Operation::Optimize).is_some());
    }

    #[test]
    fn test_missing_snapshot_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        assert!(store.load().is_none());
    }

    #[test]
    fn test_corrupt_snapshot_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json at all").unwrap();

        let store = SessionStore::new(path);
        assert!(store.load().is_none());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));

        store.save(&SessionState::default()).unwrap();
        store.clear().unwrap();
        assert!(store.load().is_none());

        store.clear().unwrap();
    }
}
