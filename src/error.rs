//! Error types
//!
//! Gameplay failure (wrong answer, collision) is a phase transition, not an error.
//! These cover the cases where the simulation cannot do what was asked.

use std::path::PathBuf;

use thiserror::Error;

/// Challenge generation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error("vocabulary pool is empty")]
    EmptyPool,
    #[error("vocabulary has {distinct} distinct answers, need at least {required}")]
    InsufficientVocabulary { distinct: usize, required: usize },
}

/// Malformed input events
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("unknown answer kind `{0}`")]
    InvalidAnswerEvent(String),
}

/// Settings, level catalog and vocabulary file errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Save file errors
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("save i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("save file is corrupt: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported save version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
}
