//! Simulation settings
//!
//! Every tunable constant of the run, persisted as JSON next to the save file.
//! Missing fields fall back to the defaults in `consts`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Simulation tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === World ===
    /// Visible world width
    pub viewport_width: f32,

    // === Player ===
    pub player_x: f32,
    pub player_width: f32,
    pub player_height: f32,
    /// Player top edge while grounded
    pub ground_y: f32,

    // === Physics ===
    /// Downward acceleration (pixels/s²)
    pub gravity: f32,
    /// Launch velocity of a jump (negative is up)
    pub jump_velocity: f32,
    /// Seconds a slide keeps the player low
    pub crouch_duration: f32,

    // === Challenges ===
    /// Armed challenges fire their dodge inside this distance
    pub trigger_distance: f32,
    pub gap_width: f32,
    pub gap_depth: f32,
    pub obstacle_width: f32,
    pub obstacle_height: f32,
    /// Distance past the viewport edge where the first challenge appears
    pub first_spawn_offset: f32,
    /// Distance past the viewport edge where replacements appear
    pub next_spawn_offset: f32,
    /// Challenges left of this x are retired
    pub retire_x: f32,

    // === Demo mode ===
    /// Autoplay answers once the challenge is this close
    pub autoplay_answer_distance: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            viewport_width: VIEWPORT_WIDTH,

            player_x: PLAYER_X,
            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            ground_y: GROUND_Y,

            gravity: GRAVITY,
            jump_velocity: JUMP_VELOCITY,
            crouch_duration: CROUCH_DURATION,

            trigger_distance: TRIGGER_DISTANCE,
            gap_width: GAP_WIDTH,
            gap_depth: GAP_DEPTH,
            obstacle_width: OBSTACLE_WIDTH,
            obstacle_height: OBSTACLE_HEIGHT,
            first_spawn_offset: FIRST_SPAWN_OFFSET,
            next_spawn_offset: NEXT_SPAWN_OFFSET,
            retire_x: RETIRE_X,

            autoplay_answer_distance: 400.0,
        }
    }
}

impl Settings {
    /// Y of the walkable surface (bottom of a standing player)
    pub fn ground_surface_y(&self) -> f32 {
        self.ground_y + self.player_height
    }

    /// Spawn x of the first challenge of a run
    pub fn first_spawn_x(&self) -> f32 {
        self.viewport_width + self.first_spawn_offset
    }

    /// Spawn x of every replacement challenge
    pub fn next_spawn_x(&self) -> f32 {
        self.viewport_width + self.next_spawn_offset
    }

    /// Reject settings the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("viewport_width", self.viewport_width),
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("gravity", self.gravity),
            ("crouch_duration", self.crouch_duration),
            ("trigger_distance", self.trigger_distance),
            ("gap_width", self.gap_width),
            ("gap_depth", self.gap_depth),
            ("obstacle_width", self.obstacle_width),
            ("obstacle_height", self.obstacle_height),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be positive")));
            }
        }
        if self.jump_velocity >= 0.0 {
            return Err(ConfigError::Invalid("jump_velocity must be negative (upward)".into()));
        }
        if self.retire_x >= self.player_x {
            return Err(ConfigError::Invalid("retire_x must be behind the player".into()));
        }
        Ok(())
    }

    /// Load settings from a JSON file (defaults if the file does not exist)
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings = serde_json::from_str(&json).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.ground_surface_y(), 400.0);
        assert_eq!(settings.first_spawn_x(), 1000.0);
        assert_eq!(settings.next_spawn_x(), 1100.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"gravity": 1000.0}"#).unwrap();
        assert_eq!(settings.gravity, 1000.0);
        assert_eq!(settings.trigger_distance, TRIGGER_DISTANCE);
    }

    #[test]
    fn test_validate_rejects_upward_gravity() {
        let settings = Settings {
            gravity: -5.0,
            ..Default::default()
        };
        assert!(matches!(settings.validate(), Err(ConfigError::Invalid(_))));

        let settings = Settings {
            jump_velocity: 10.0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join("nope.json")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            crouch_duration: 1.25,
            ..Default::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_load_malformed_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Settings::load(&path), Err(ConfigError::Json { .. })));
    }
}
