//! Session state and events
//!
//! The run-level bookkeeping the tick loop owns. Player, challenge and scroll
//! state live in their own components; this is what ties a run together.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::challenge::ChallengeKind;
use super::collision::FatalCause;
use crate::error::GenerateError;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Level select
    Menu,
    /// Level chosen, waiting to start
    Start,
    /// Active gameplay
    Playing,
    /// Run ended by a wrong answer or a hazard
    GameOver,
    /// Score goal reached
    LevelComplete,
}

impl RunPhase {
    /// A new run may be started from here
    pub fn can_start(&self) -> bool {
        matches!(
            self,
            RunPhase::Start | RunPhase::GameOver | RunPhase::LevelComplete
        )
    }
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(
            self.seed
                .wrapping_add(self.stream.wrapping_mul(0x9E37_79B9_7F4A_7C15)),
        )
    }

    /// Independent stream for each run of a session
    pub fn for_run(&self, run_id: u32) -> Self {
        Self {
            seed: self.seed,
            stream: run_id as u64,
        }
    }
}

/// Run-level state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    /// Bumped on every run start; events and timers from older runs are stale
    pub run_id: u32,
    pub phase: RunPhase,
    /// Level being played (or about to be)
    pub level_id: u32,
    /// Ticks simulated in the current run
    pub time_ticks: u64,
    pub rng_state: RngState,
}

impl SessionState {
    pub fn new(seed: u64, level_id: u32) -> Self {
        Self {
            run_id: 0,
            phase: RunPhase::Menu,
            level_id,
            time_ticks: 0,
            rng_state: RngState::new(seed),
        }
    }
}

/// Something that happened during a tick
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    RunStarted { level_id: u32 },
    ChallengeSpawned { challenge_id: u32, kind: ChallengeKind },
    AnswerAccepted { kind: ChallengeKind, points: u64 },
    /// Answer for a kind that isn't pending; dropped without scoring
    AnswerIgnored { kind: ChallengeKind },
    DodgeFired { kind: ChallengeKind },
    ChallengeRetired { challenge_id: u32, bonus: u64 },
    ScrollSpeedChanged { speed: f32 },
    ScoreChanged { score: u64 },
    /// The previous challenge stays in place until generation succeeds
    GenerationFailed { error: GenerateError },
    GameOver { cause: FatalCause, score: u64 },
    LevelComplete {
        level_id: u32,
        score: u64,
        coins: u64,
        unlocked: Option<u32>,
    },
    NewHighScore { score: u64 },
}

/// An event tagged with the run it came from
#[derive(Debug, Clone, PartialEq)]
pub struct SessionEvent {
    pub run_id: u32,
    pub event: GameEvent,
}
