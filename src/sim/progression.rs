//! Score and level progression

use serde::{Deserialize, Serialize};

use crate::consts::COIN_DIVISOR;
use crate::level::{LevelCatalog, LevelDefinition};
use crate::persistence::ProgressRecord;

/// Running score against the active level's goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionController {
    level_id: u32,
    points_required: u64,
    score: u64,
}

impl ProgressionController {
    pub fn new(level: &LevelDefinition) -> Self {
        Self::with_score(level, 0)
    }

    /// Controller resuming a run at `score`
    pub fn with_score(level: &LevelDefinition, score: u64) -> Self {
        Self {
            level_id: level.id,
            points_required: level.points_required,
            score,
        }
    }

    pub fn level_id(&self) -> u32 {
        self.level_id
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn points_required(&self) -> u64 {
        self.points_required
    }

    /// Add points. Returns true if the level goal is now met.
    pub fn award(&mut self, points: u64) -> bool {
        self.score = self.score.saturating_add(points);
        self.goal_reached()
    }

    pub fn goal_reached(&self) -> bool {
        self.score >= self.points_required
    }

    /// Coins earned for finishing with the current score
    pub fn coin_award(&self) -> u64 {
        self.score / COIN_DIVISOR
    }
}

/// What finishing a level earned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelReward {
    pub coins: u64,
    /// Level unlocked by this completion (None if already unlocked or last level)
    pub unlocked: Option<u32>,
    /// Level the player continues on
    pub next_level: u32,
}

/// Apply a level completion to the progress record
pub fn apply_level_complete(
    progress: &mut ProgressRecord,
    catalog: &LevelCatalog,
    controller: &ProgressionController,
) -> LevelReward {
    let coins = controller.coin_award();
    progress.total_coins = progress.total_coins.saturating_add(coins);

    let next = catalog.next_after(controller.level_id()).map(|l| l.id);
    let unlocked = next.filter(|&id| progress.unlock(id));
    let next_level = next.unwrap_or(controller.level_id());
    progress.current_level = next_level;

    LevelReward {
        coins,
        unlocked,
        next_level,
    }
}
