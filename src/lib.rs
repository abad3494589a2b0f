//! Lingo Leap - A vocabulary-gated endless runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, challenges, collisions, progression)
//! - `vocabulary`: Word pool the challenges are drawn from
//! - `level`: Data-driven level catalog
//! - `persistence`: Save/load of progress with a versioned envelope
//! - `settings`: Tunable simulation constants

pub mod error;
pub mod highscores;
pub mod level;
pub mod persistence;
pub mod settings;
pub mod sim;
pub mod vocabulary;

pub use error::{ConfigError, GenerateError, InputError, PersistError};
pub use highscores::HighScores;
pub use level::{LevelCatalog, LevelDefinition, PromptStyle};
pub use settings::Settings;
pub use vocabulary::{AnswerField, VocabularyEntry, VocabularyPool, VocabularySource};

/// Game configuration constants
///
/// Logical coordinate space: y grows downward, distances in pixels, time in seconds.
pub mod consts {
    /// Fixed simulation timestep (one 60 Hz animation frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta fed to the accumulator
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Visible world width
    pub const VIEWPORT_WIDTH: f32 = 800.0;

    /// Player defaults
    pub const PLAYER_X: f32 = 100.0;
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 50.0;
    /// Player top edge while standing on the ground
    pub const GROUND_Y: f32 = 350.0;

    /// Downward acceleration (pixels/s²)
    pub const GRAVITY: f32 = 4320.0;
    /// Initial vertical velocity of a jump (negative is up)
    pub const JUMP_VELOCITY: f32 = -720.0;
    /// How long a slide keeps the player low
    pub const CROUCH_DURATION: f32 = 0.8;

    /// An armed challenge fires its dodge when it is closer than this
    pub const TRIGGER_DISTANCE: f32 = 150.0;

    /// Gap hazard (jump challenges)
    pub const GAP_WIDTH: f32 = 50.0;
    pub const GAP_DEPTH: f32 = 20.0;

    /// Obstacle hazard (slide challenges)
    pub const OBSTACLE_WIDTH: f32 = 40.0;
    pub const OBSTACLE_HEIGHT: f32 = 60.0;

    /// Spawn offsets past the right edge of the viewport
    pub const FIRST_SPAWN_OFFSET: f32 = 200.0;
    pub const NEXT_SPAWN_OFFSET: f32 = 300.0;
    /// Challenges left of this x are retired
    pub const RETIRE_X: f32 = -200.0;

    /// Score awards
    pub const JUMP_ANSWER_POINTS: u64 = 100;
    pub const SLIDE_ANSWER_POINTS: u64 = 50;
    pub const PASS_BONUS_POINTS: u64 = 10;
    /// Coins per point on level completion (score / COIN_DIVISOR)
    pub const COIN_DIVISOR: u64 = 10;

    /// Options shown per challenge (correct answer + distractors)
    pub const OPTION_COUNT: usize = 3;
}
