//! Challenges and their generation
//!
//! A challenge is one quiz-gated hazard: a prompt, three options, and a gap
//! (jump) or obstacle (slide) scrolling toward the player.

use std::collections::HashSet;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{JUMP_ANSWER_POINTS, OPTION_COUNT, SLIDE_ANSWER_POINTS};
use crate::error::{GenerateError, InputError};
use crate::level::{LevelDefinition, PromptStyle};
use crate::vocabulary::{AnswerField, VocabularySource};

/// Which dodge a challenge unlocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChallengeKind {
    /// Gap in the ground, cleared by jumping
    Jump,
    /// Raised obstacle, cleared by sliding under
    Slide,
}

impl ChallengeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChallengeKind::Jump => "jump",
            ChallengeKind::Slide => "slide",
        }
    }

    /// Score for answering this kind correctly
    pub fn answer_points(&self) -> u64 {
        match self {
            ChallengeKind::Jump => JUMP_ANSWER_POINTS,
            ChallengeKind::Slide => SLIDE_ANSWER_POINTS,
        }
    }
}

impl FromStr for ChallengeKind {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "jump" => Ok(ChallengeKind::Jump),
            "slide" => Ok(ChallengeKind::Slide),
            _ => Err(InputError::InvalidAnswerEvent(s.to_string())),
        }
    }
}

/// Where a challenge is in its life
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChallengeStage {
    /// Waiting for the right answer
    Pending,
    /// Answered correctly, dodge not fired yet
    Armed,
    /// Dodge fired
    Resolved,
    /// Scrolled off behind the player
    Retired,
}

/// One quiz-gated hazard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: u32,
    pub kind: ChallengeKind,
    /// Word or icon shown to the player
    pub prompt: String,
    pub correct_answer: String,
    /// Three distinct options, `correct_answer` exactly once
    pub options: Vec<String>,
    /// Left edge of the hazard
    pub world_x: f32,
    pub stage: ChallengeStage,
}

impl Challenge {
    /// Answered correctly at some point (collision no longer applies)
    pub fn is_cleared(&self) -> bool {
        self.stage != ChallengeStage::Pending
    }

    /// Dodge is primed and waiting for the trigger window
    pub fn is_armed(&self) -> bool {
        self.stage == ChallengeStage::Armed
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.stage, ChallengeStage::Resolved | ChallengeStage::Retired)
    }

    pub fn is_passed(&self) -> bool {
        self.stage == ChallengeStage::Retired
    }

    /// Horizontal distance from the player's left edge to the hazard
    pub fn gap_to(&self, player_x: f32) -> f32 {
        self.world_x - player_x
    }
}

/// Builds challenges from a vocabulary with a seeded RNG
#[derive(Debug, Clone)]
pub struct ChallengeGenerator {
    rng: Pcg32,
    next_id: u32,
}

impl ChallengeGenerator {
    pub fn new(seed: u64) -> Self {
        Self::from_rng(Pcg32::seed_from_u64(seed))
    }

    pub fn from_rng(rng: Pcg32) -> Self {
        Self { rng, next_id: 1 }
    }

    /// Generate a challenge of random kind at `spawn_x`
    pub fn generate(
        &mut self,
        vocab: &dyn VocabularySource,
        spawn_x: f32,
        level: &LevelDefinition,
    ) -> Result<Challenge, GenerateError> {
        let kind = if self.rng.random_bool(0.5) {
            ChallengeKind::Jump
        } else {
            ChallengeKind::Slide
        };
        self.generate_kind(vocab, spawn_x, level, kind)
    }

    /// Generate a challenge of a given kind
    pub fn generate_kind(
        &mut self,
        vocab: &dyn VocabularySource,
        spawn_x: f32,
        level: &LevelDefinition,
        kind: ChallengeKind,
    ) -> Result<Challenge, GenerateError> {
        let entry = vocab.sample(&mut self.rng).ok_or(GenerateError::EmptyPool)?;

        let (prompt, answer_field) = match (level.prompt_style(), kind) {
            (PromptStyle::Translate, ChallengeKind::Jump) => {
                (entry.source.clone(), AnswerField::Target)
            }
            (PromptStyle::Translate, ChallengeKind::Slide) => {
                (entry.target.clone(), AnswerField::Source)
            }
            // Entries without an icon fall back to their translation
            (PromptStyle::Icon, _) => (
                entry.icon.clone().unwrap_or_else(|| entry.target.clone()),
                AnswerField::Source,
            ),
        };
        let correct_answer = entry.field(answer_field).to_string();

        // Distinct wrong answers, in pool order
        let mut seen = HashSet::new();
        let candidates: Vec<&str> = vocab
            .all_except(entry, answer_field)
            .into_iter()
            .map(|e| e.field(answer_field))
            .filter(|answer| seen.insert(*answer))
            .collect();

        let needed = OPTION_COUNT - 1;
        if candidates.len() < needed {
            return Err(GenerateError::InsufficientVocabulary {
                distinct: candidates.len() + 1,
                required: OPTION_COUNT,
            });
        }

        let mut options = Vec::with_capacity(OPTION_COUNT);
        options.push(correct_answer.clone());
        for idx in rand::seq::index::sample(&mut self.rng, candidates.len(), needed).iter() {
            options.push(candidates[idx].to_string());
        }
        options.shuffle(&mut self.rng);

        let id = self.next_id;
        self.next_id += 1;

        Ok(Challenge {
            id,
            kind,
            prompt,
            correct_answer,
            options,
            world_x: spawn_x,
            stage: ChallengeStage::Pending,
        })
    }
}
