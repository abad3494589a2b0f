//! Finished-run leaderboard
//!
//! Keeps the best `MAX_HIGH_SCORES` runs, best first. The top entry is the
//! score a new run has to beat to count as a new high score.

use serde::{Deserialize, Serialize};

/// Runs kept on the board
pub const MAX_HIGH_SCORES: usize = 10;

/// One finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Level the run was played on
    pub level: u32,
    /// Unix milliseconds, as supplied by the store
    pub timestamp: f64,
}

/// Where a recorded run landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// 1-based position on the board
    pub rank: usize,
    /// Beat the previous top score (or the board was empty)
    pub new_best: bool,
}

/// Best runs, sorted by score descending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Index a score would be inserted at. Equal scores go behind older runs.
    fn slot(&self, score: u64) -> usize {
        self.entries.partition_point(|e| e.score >= score)
    }

    /// A zero-point run never makes the board
    pub fn qualifies(&self, score: u64) -> bool {
        score > 0 && self.slot(score) < MAX_HIGH_SCORES
    }

    /// Record a finished run. Returns `None` if it didn't make the board.
    pub fn record(&mut self, score: u64, level: u32, timestamp: f64) -> Option<Placement> {
        if !self.qualifies(score) {
            return None;
        }
        let new_best = self.top_score().is_none_or(|best| score > best);
        let slot = self.slot(score);
        self.entries.insert(
            slot,
            HighScoreEntry {
                score,
                level,
                timestamp,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(Placement {
            rank: slot + 1,
            new_best,
        })
    }
}
