//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Storage is only touched through the `ProgressSink` on run end
//! - No rendering or platform dependencies

pub mod challenge;
pub mod collision;
pub mod lifecycle;
pub mod physics;
pub mod progression;
pub mod scroller;
pub mod session;
pub mod state;
pub mod tick;

pub use challenge::{Challenge, ChallengeGenerator, ChallengeKind, ChallengeStage};
pub use collision::{FatalCause, Rect, check_hazard, hazard_rect};
pub use lifecycle::{AnswerOutcome, ChallengeLifecycle};
pub use physics::{Physics, PlayerPose, PlayerState};
pub use progression::{LevelReward, ProgressionController, apply_level_complete};
pub use scroller::WorldScroller;
pub use session::GameSession;
pub use state::{GameEvent, RngState, RunPhase, SessionEvent, SessionState};
pub use tick::{AnswerEvent, FixedStepper, TickInput, tick};
