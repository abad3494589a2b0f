//! Versioned save envelope

use serde::{Deserialize, Serialize};

use super::{ProgressRecord, Snapshot};
use crate::error::PersistError;
use crate::highscores::HighScores;

/// Current save format version
pub const SAVE_VERSION: u32 = 1;

/// On-disk save format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveEnvelope {
    pub version: u32,
    /// Top score, duplicated from the leaderboard for quick inspection
    pub high_score: u64,
    pub high_scores: HighScores,
    pub progress: ProgressRecord,
}

impl SaveEnvelope {
    pub fn wrap(snapshot: &Snapshot) -> Self {
        Self {
            version: SAVE_VERSION,
            high_score: snapshot.high_scores.top_score().unwrap_or(0),
            high_scores: snapshot.high_scores.clone(),
            progress: snapshot.progress.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and version-check a save
    pub fn from_json(json: &str) -> Result<Self, PersistError> {
        let envelope: SaveEnvelope = serde_json::from_str(json)?;
        if envelope.version != SAVE_VERSION {
            return Err(PersistError::UnsupportedVersion {
                found: envelope.version,
                expected: SAVE_VERSION,
            });
        }
        Ok(envelope)
    }

    pub fn into_snapshot(self) -> Snapshot {
        Snapshot {
            high_scores: self.high_scores,
            progress: self.progress,
        }
    }
}
