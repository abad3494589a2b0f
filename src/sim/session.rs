//! Game session
//!
//! Composes the player, the scroller, the challenge lifecycle and progression
//! into one state machine: Menu -> Start -> Playing -> GameOver | LevelComplete.
//!
//! Everything that happens inside a run is driven by `step` plus the single
//! external stimulus, `submit_answer`. Stopping a run always discards the
//! in-flight challenge and resets the player, so nothing from an old run can
//! leak into the next one.

use super::challenge::{Challenge, ChallengeGenerator, ChallengeKind};
use super::collision::{FatalCause, check_hazard};
use super::lifecycle::{AnswerOutcome, ChallengeLifecycle};
use super::physics::{Physics, PlayerState};
use super::progression::{ProgressionController, apply_level_complete};
use super::scroller::WorldScroller;
use super::state::{GameEvent, RunPhase, SessionEvent, SessionState};
use crate::consts::PASS_BONUS_POINTS;
use crate::error::{GenerateError, InputError};
use crate::highscores::HighScores;
use crate::level::{LevelCatalog, LevelDefinition};
use crate::persistence::{ProgressRecord, ProgressSink, Snapshot};
use crate::settings::Settings;
use crate::vocabulary::VocabularySource;

/// One player's session: menus, runs, and the results they produce
pub struct GameSession<S: ProgressSink> {
    settings: Settings,
    physics: Physics,
    catalog: LevelCatalog,
    vocab: Box<dyn VocabularySource>,
    /// Vocabulary edits wait here until the next run starts
    staged_vocab: Option<Box<dyn VocabularySource>>,
    generator: ChallengeGenerator,
    /// Replacement generation has failed since the last success
    generation_failing: bool,
    state: SessionState,
    player: PlayerState,
    scroller: WorldScroller,
    lifecycle: ChallengeLifecycle,
    progression: ProgressionController,
    progress: ProgressRecord,
    high_scores: HighScores,
    sink: S,
    events: Vec<SessionEvent>,
}

impl<S: ProgressSink> GameSession<S> {
    pub fn new(
        settings: Settings,
        catalog: LevelCatalog,
        vocab: Box<dyn VocabularySource>,
        snapshot: Snapshot,
        sink: S,
        seed: u64,
    ) -> Self {
        let physics = Physics::from_settings(&settings);
        let Snapshot {
            high_scores,
            progress,
        } = snapshot;

        // Resume on the saved level if it still exists and is unlocked
        let level = catalog
            .get(progress.current_level)
            .filter(|l| progress.is_unlocked(l.id))
            .or_else(|| catalog.first())
            .cloned()
            .unwrap_or_else(|| LevelCatalog::default().levels()[0].clone());

        let state = SessionState::new(seed, level.id);
        let generator = ChallengeGenerator::from_rng(state.rng_state.to_rng());

        Self {
            player: physics.spawn_player(),
            physics,
            settings,
            catalog,
            vocab,
            staged_vocab: None,
            generator,
            generation_failing: false,
            scroller: WorldScroller::new(&level),
            lifecycle: ChallengeLifecycle::new(),
            progression: ProgressionController::new(&level),
            state,
            progress,
            high_scores,
            sink,
            events: Vec::new(),
        }
    }

    // === Accessors ===

    pub fn phase(&self) -> RunPhase {
        self.state.phase
    }

    pub fn run_id(&self) -> u32 {
        self.state.run_id
    }

    pub fn time_ticks(&self) -> u64 {
        self.state.time_ticks
    }

    pub fn score(&self) -> u64 {
        self.progression.score()
    }

    pub fn scroll_speed(&self) -> f32 {
        self.scroller.speed()
    }

    pub fn level_id(&self) -> u32 {
        self.state.level_id
    }

    pub fn level(&self) -> Option<&LevelDefinition> {
        self.catalog.get(self.state.level_id)
    }

    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn challenge(&self) -> Option<&Challenge> {
        self.lifecycle.active()
    }

    pub fn progress(&self) -> &ProgressRecord {
        &self.progress
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Take all events queued since the last call
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    // === Phase transitions ===

    /// Pick an unlocked level from the menu
    pub fn select_level(&mut self, level_id: u32) -> bool {
        if !matches!(self.state.phase, RunPhase::Menu | RunPhase::Start) {
            return false;
        }
        if self.catalog.get(level_id).is_none() || !self.progress.is_unlocked(level_id) {
            log::debug!("Level {level_id} is not available");
            return false;
        }
        self.state.level_id = level_id;
        self.state.phase = RunPhase::Start;
        true
    }

    /// Start a fresh run on the selected level.
    ///
    /// Fails without changing phase if the vocabulary cannot produce a challenge.
    pub fn start_run(&mut self) -> Result<(), GenerateError> {
        if !self.state.phase.can_start() {
            return Ok(());
        }
        if let Some(vocab) = self.staged_vocab.take() {
            self.vocab = vocab;
        }
        let level = self.current_level_def();

        let run_id = self.state.run_id + 1;
        let mut generator =
            ChallengeGenerator::from_rng(self.state.rng_state.for_run(run_id).to_rng());
        let first = generator.generate(self.vocab.as_ref(), self.settings.first_spawn_x(), &level)?;

        self.state.run_id = run_id;
        self.state.time_ticks = 0;
        self.state.phase = RunPhase::Playing;
        self.generator = generator;
        self.generation_failing = false;
        self.player = self.physics.spawn_player();
        self.scroller = WorldScroller::new(&level);
        self.progression = ProgressionController::new(&level);
        self.lifecycle.clear();

        log::info!("Run {} started on level {}", run_id, level.id);
        self.emit(GameEvent::RunStarted { level_id: level.id });
        self.install(first);
        Ok(())
    }

    /// Leave whatever is going on and go back to level select
    pub fn return_to_menu(&mut self) {
        self.stop_run();
        self.state.phase = RunPhase::Menu;
    }

    /// Swap the vocabulary; takes effect when the next run starts
    pub fn set_vocabulary(&mut self, vocab: Box<dyn VocabularySource>) {
        if self.state.phase == RunPhase::Playing {
            self.staged_vocab = Some(vocab);
        } else {
            self.vocab = vocab;
            self.staged_vocab = None;
        }
    }

    // === Gameplay ===

    /// The player picked an option
    pub fn submit_answer(&mut self, kind: ChallengeKind, value: &str) -> AnswerOutcome {
        if self.state.phase != RunPhase::Playing {
            return AnswerOutcome::Ignored;
        }
        let outcome = self.lifecycle.submit_answer(kind, value);
        match outcome {
            AnswerOutcome::Correct { points } => {
                log::debug!("Correct {} answer: {value}", kind.as_str());
                self.emit(GameEvent::AnswerAccepted { kind, points });
                self.award(points);
            }
            AnswerOutcome::Wrong => self.game_over(FatalCause::WrongAnswer),
            AnswerOutcome::Ignored => self.emit(GameEvent::AnswerIgnored { kind }),
        }
        outcome
    }

    /// Text-keyed answer, for front ends that pass the kind as a string
    pub fn submit_answer_str(&mut self, kind: &str, value: &str) -> Result<AnswerOutcome, InputError> {
        let kind = kind.parse::<ChallengeKind>()?;
        Ok(self.submit_answer(kind, value))
    }

    /// Advance the run by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        if self.state.phase != RunPhase::Playing {
            return;
        }
        self.state.time_ticks += 1;

        self.physics.step(&mut self.player, dt);

        // A failed replacement is retried every tick
        if self.lifecycle.needs_replacement() {
            self.spawn_next();
        }

        self.lifecycle.advance(self.scroller.distance(dt));

        if let Some(kind) = self.lifecycle.try_fire_dodge(
            &self.physics,
            &mut self.player,
            self.settings.trigger_distance,
        ) {
            log::debug!("Dodge fired: {}", kind.as_str());
            self.emit(GameEvent::DodgeFired { kind });
        }

        let hitbox = self.physics.hitbox(&self.player);
        let fatal = self
            .lifecycle
            .active()
            .and_then(|challenge| check_hazard(&self.player, &hitbox, challenge, &self.settings));
        if let Some(cause) = fatal {
            self.game_over(cause);
            return;
        }

        if let Some(challenge_id) = self.lifecycle.retire_if_behind(self.settings.retire_x) {
            log::debug!("Challenge {challenge_id} retired");
            self.emit(GameEvent::ChallengeRetired {
                challenge_id,
                bonus: PASS_BONUS_POINTS,
            });
            let speed = self.scroller.ratchet();
            self.emit(GameEvent::ScrollSpeedChanged { speed });
            self.award(PASS_BONUS_POINTS);
            // The bonus may have finished the level
            if self.state.phase == RunPhase::Playing {
                self.spawn_next();
            }
        }
    }

    // === Internals ===

    fn emit(&mut self, event: GameEvent) {
        self.events.push(SessionEvent {
            run_id: self.state.run_id,
            event,
        });
    }

    fn current_level_def(&self) -> LevelDefinition {
        self.catalog
            .get(self.state.level_id)
            .or_else(|| self.catalog.first())
            .cloned()
            .unwrap_or_else(|| LevelCatalog::default().levels()[0].clone())
    }

    fn install(&mut self, challenge: Challenge) {
        log::debug!(
            "Challenge {} ({}) spawned at x={}: {}",
            challenge.id,
            challenge.kind.as_str(),
            challenge.world_x,
            challenge.prompt
        );
        self.emit(GameEvent::ChallengeSpawned {
            challenge_id: challenge.id,
            kind: challenge.kind,
        });
        self.lifecycle.install(challenge);
    }

    /// Replace the retired challenge; on failure the old one stays put.
    /// A streak of failures is reported once.
    fn spawn_next(&mut self) {
        let level = self.current_level_def();
        match self
            .generator
            .generate(self.vocab.as_ref(), self.settings.next_spawn_x(), &level)
        {
            Ok(challenge) => {
                if self.generation_failing {
                    log::info!("Challenge generation recovered");
                    self.generation_failing = false;
                }
                self.install(challenge);
            }
            Err(error) => {
                if !self.generation_failing {
                    log::warn!("Challenge generation failed: {error}");
                    self.generation_failing = true;
                    self.emit(GameEvent::GenerationFailed { error });
                }
            }
        }
    }

    fn award(&mut self, points: u64) {
        if self.state.phase != RunPhase::Playing {
            return;
        }
        let goal = self.progression.award(points);
        self.emit(GameEvent::ScoreChanged {
            score: self.progression.score(),
        });
        if goal {
            self.complete_level();
        }
    }

    /// Discard per-run state that must not survive the run
    fn stop_run(&mut self) {
        self.lifecycle.clear();
        self.player = self.physics.spawn_player();
    }

    fn game_over(&mut self, cause: FatalCause) {
        let score = self.progression.score();
        log::info!("Run {} over ({cause:?}) with {score} points", self.state.run_id);
        self.state.phase = RunPhase::GameOver;
        self.stop_run();
        self.emit(GameEvent::GameOver { cause, score });
        self.record_high_score();
    }

    fn complete_level(&mut self) {
        let score = self.progression.score();
        let level_id = self.progression.level_id();
        self.state.phase = RunPhase::LevelComplete;
        self.stop_run();

        let reward = apply_level_complete(&mut self.progress, &self.catalog, &self.progression);
        log::info!(
            "Level {level_id} complete with {score} points, {} coins",
            reward.coins
        );
        if let Err(err) = self.sink.save_progress(&self.progress) {
            log::warn!("Failed to save progress: {err}");
        }
        self.state.level_id = reward.next_level;

        self.emit(GameEvent::LevelComplete {
            level_id,
            score,
            coins: reward.coins,
            unlocked: reward.unlocked,
        });
        self.record_high_score();
    }

    fn record_high_score(&mut self) {
        let score = self.progression.score();
        let level_id = self.progression.level_id();
        let timestamp = self.sink.timestamp_ms();
        let Some(placement) = self.high_scores.record(score, level_id, timestamp) else {
            return;
        };
        if let Err(err) = self.sink.save_high_scores(&self.high_scores) {
            log::warn!("Failed to save high scores: {err}");
        }
        if placement.new_best {
            log::info!("New high score: {score}");
            self.emit(GameEvent::NewHighScore { score });
        }
    }

    // === Test hooks ===

    #[cfg(test)]
    pub(crate) fn place_challenge(&mut self, challenge: Challenge) {
        self.lifecycle.install(challenge);
    }

    #[cfg(test)]
    pub(crate) fn set_score(&mut self, score: u64) {
        let level = self.current_level_def();
        self.progression = ProgressionController::with_score(&level, score);
    }

    #[cfg(test)]
    pub(crate) fn player_mut(&mut self) -> &mut PlayerState {
        &mut self.player
    }
}
