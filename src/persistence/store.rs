//! JSON file store with backup rotation
//!
//! Writes go to `<save>.tmp` first, the previous save moves to `<save>.bak`,
//! then the tmp file is renamed into place. A corrupt primary falls back to
//! the backup on load.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use super::envelope::SaveEnvelope;
use super::{ProgressRecord, ProgressSink, ProgressStore, Snapshot};
use crate::error::PersistError;
use crate::highscores::HighScores;

/// File-backed progress store
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    /// Last written state; each save rewrites the whole envelope
    snapshot: Snapshot,
}

impl JsonFileStore {
    /// Open a store, reading whatever is on disk
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PersistError> {
        let mut store = Self {
            path: path.into(),
            snapshot: Snapshot::default(),
        };
        store.snapshot = store.load()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    fn tmp_path(&self) -> PathBuf {
        self.path.with_extension("tmp")
    }

    fn backup_path(&self) -> PathBuf {
        self.path.with_extension("bak")
    }

    fn read(path: &Path) -> Result<Snapshot, PersistError> {
        let json = fs::read_to_string(path)?;
        Ok(SaveEnvelope::from_json(&json)?.into_snapshot())
    }

    fn write(&self) -> Result<(), PersistError> {
        let json = SaveEnvelope::wrap(&self.snapshot).to_json()?;
        let tmp = self.tmp_path();
        fs::write(&tmp, json)?;
        if self.path.exists() {
            fs::rename(&self.path, self.backup_path())?;
        }
        fs::rename(&tmp, &self.path)?;
        log::info!("Progress saved to {}", self.path.display());
        Ok(())
    }
}

impl ProgressStore for JsonFileStore {
    fn load(&self) -> Result<Snapshot, PersistError> {
        let backup = self.backup_path();
        if !self.path.exists() {
            // A write interrupted between its two renames leaves only the backup
            if backup.exists() {
                log::warn!("No save at {}, restoring backup", self.path.display());
                return Self::read(&backup);
            }
            log::info!("No save at {}, starting fresh", self.path.display());
            return Ok(Snapshot::default());
        }
        match Self::read(&self.path) {
            Ok(snapshot) => Ok(snapshot),
            Err(err) if backup.exists() => {
                log::warn!("Save {} unreadable ({err}), trying backup", self.path.display());
                Self::read(&backup)
            }
            Err(err) => Err(err),
        }
    }
}

impl ProgressSink for JsonFileStore {
    fn save_high_scores(&mut self, scores: &HighScores) -> Result<(), PersistError> {
        self.snapshot.high_scores = scores.clone();
        self.write()
    }

    fn save_progress(&mut self, progress: &ProgressRecord) -> Result<(), PersistError> {
        self.snapshot.progress = progress.clone();
        self.write()
    }

    /// Wall clock; 0 if the system clock is before 1970
    fn timestamp_ms(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_is_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("save.json")).unwrap();
        assert_eq!(store.snapshot(), &Snapshot::default());
    }

    #[test]
    fn test_save_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        let mut progress = ProgressRecord::default();
        progress.unlock(2);
        progress.current_level = 2;
        progress.total_coins = 250;
        store.save_progress(&progress).unwrap();

        let mut scores = HighScores::new();
        scores.record(2500, 1, 0.0);
        store.save_high_scores(&scores).unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.snapshot().progress, progress);
        assert_eq!(reopened.snapshot().high_scores.top_score(), Some(2500));
        assert!(!store.tmp_path().exists());
        assert!(store.backup_path().exists());
    }

    #[test]
    fn test_corrupt_save_falls_back_to_backup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        let mut progress = ProgressRecord::default();
        progress.total_coins = 10;
        store.save_progress(&progress).unwrap();
        progress.total_coins = 20;
        store.save_progress(&progress).unwrap();

        fs::write(&path, "garbage").unwrap();
        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.snapshot().progress.total_coins, 10);
    }

    #[test]
    fn test_missing_save_restores_backup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        let mut progress = ProgressRecord::default();
        progress.total_coins = 250;
        store.save_progress(&progress).unwrap();
        progress.total_coins = 500;
        store.save_progress(&progress).unwrap();

        // Interrupted write: the save was moved aside but tmp never landed
        fs::rename(&path, store.backup_path()).unwrap();
        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.snapshot().progress.total_coins, 500);
    }

    #[test]
    fn test_wall_clock_timestamps() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("save.json")).unwrap();
        assert!(store.timestamp_ms() > 0.0);
    }

    #[test]
    fn test_corrupt_save_without_backup_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.json");
        fs::write(&path, "garbage").unwrap();
        assert!(matches!(JsonFileStore::open(&path), Err(PersistError::Json(_))));
    }
}
