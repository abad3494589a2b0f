//! Data-driven level catalog
//!
//! Levels only tune pacing and goals; the simulation rules are the same on
//! every level.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Id of the first (base) level
pub const BASE_LEVEL_ID: u32 = 1;

/// How a challenge presents its prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PromptStyle {
    /// Show a word, answer with its translation (direction depends on kind)
    Translate,
    /// Show the entry's icon, answer with the source word
    Icon,
}

/// One level's goal and pacing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDefinition {
    pub id: u32,
    /// Score that completes the level
    pub points_required: u64,
    /// Scroll speed at run start (pixels/s)
    pub initial_scroll_speed: f32,
    /// Added to the scroll speed every time a challenge retires
    pub scroll_speed_increment: f32,
    /// Scroll speed never exceeds this
    pub scroll_speed_cap: f32,
}

impl LevelDefinition {
    pub fn prompt_style(&self) -> PromptStyle {
        if self.id <= BASE_LEVEL_ID {
            PromptStyle::Translate
        } else {
            PromptStyle::Icon
        }
    }
}

/// Ordered list of levels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelCatalog {
    levels: Vec<LevelDefinition>,
}

impl Default for LevelCatalog {
    fn default() -> Self {
        let level = |id, points_required, initial, increment, cap| LevelDefinition {
            id,
            points_required,
            initial_scroll_speed: initial,
            scroll_speed_increment: increment,
            scroll_speed_cap: cap,
        };
        Self {
            levels: vec![
                level(1, 2500, 300.0, 12.0, 720.0),
                level(2, 4000, 330.0, 12.0, 780.0),
                level(3, 6000, 360.0, 15.0, 840.0),
                level(4, 8500, 390.0, 15.0, 900.0),
                level(5, 12000, 420.0, 18.0, 960.0),
            ],
        }
    }
}

impl LevelCatalog {
    /// Build a catalog, rejecting inconsistent definitions
    pub fn new(levels: Vec<LevelDefinition>) -> Result<Self, ConfigError> {
        let catalog = Self { levels };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a JSON catalog
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog: LevelCatalog =
            serde_json::from_str(&json).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        catalog.validate()?;
        log::info!("Loaded {} levels from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.levels.is_empty() {
            return Err(ConfigError::Invalid("level catalog is empty".into()));
        }
        let mut ids = HashSet::new();
        for level in &self.levels {
            if !ids.insert(level.id) {
                return Err(ConfigError::Invalid(format!("duplicate level id {}", level.id)));
            }
            if level.points_required == 0 {
                return Err(ConfigError::Invalid(format!(
                    "level {} requires zero points",
                    level.id
                )));
            }
            if level.initial_scroll_speed <= 0.0 || level.scroll_speed_increment < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "level {} has a non-positive scroll speed",
                    level.id
                )));
            }
            if level.initial_scroll_speed > level.scroll_speed_cap {
                return Err(ConfigError::Invalid(format!(
                    "level {} starts above its speed cap",
                    level.id
                )));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn levels(&self) -> &[LevelDefinition] {
        &self.levels
    }

    pub fn get(&self, id: u32) -> Option<&LevelDefinition> {
        self.levels.iter().find(|l| l.id == id)
    }

    pub fn first(&self) -> Option<&LevelDefinition> {
        self.levels.first()
    }

    /// Level following `id` in catalog order
    pub fn next_after(&self, id: u32) -> Option<&LevelDefinition> {
        let idx = self.levels.iter().position(|l| l.id == id)?;
        self.levels.get(idx + 1)
    }
}
