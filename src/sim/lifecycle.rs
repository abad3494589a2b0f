//! Challenge lifecycle
//!
//! Owns the single active challenge:
//! Pending -> Armed (correct answer) -> Resolved (dodge fired) -> Retired (off-screen).
//! Wrong answers never move this machine; the session ends the run instead.

use super::challenge::{Challenge, ChallengeKind, ChallengeStage};
use super::physics::{Physics, PlayerState};

/// Result of submitting an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// No pending challenge of that kind; nothing happens
    Ignored,
    /// Challenge armed, award `points`
    Correct { points: u64 },
    /// Fatal
    Wrong,
}

/// Tracks the active challenge as it scrolls toward the player
#[derive(Debug, Clone, Default)]
pub struct ChallengeLifecycle {
    active: Option<Challenge>,
}

impl ChallengeLifecycle {
    pub fn new() -> Self {
        Self { active: None }
    }

    pub fn active(&self) -> Option<&Challenge> {
        self.active.as_ref()
    }

    /// Replace the active challenge
    pub fn install(&mut self, challenge: Challenge) {
        self.active = Some(challenge);
    }

    /// Drop the in-flight challenge (run stopped)
    pub fn clear(&mut self) {
        self.active = None;
    }

    /// No challenge in play, or the current one has retired
    pub fn needs_replacement(&self) -> bool {
        self.active.as_ref().is_none_or(|c| c.is_passed())
    }

    /// Check an answer against the pending challenge
    pub fn submit_answer(&mut self, kind: ChallengeKind, value: &str) -> AnswerOutcome {
        let Some(challenge) = self.active.as_mut() else {
            return AnswerOutcome::Ignored;
        };
        if challenge.kind != kind || challenge.stage != ChallengeStage::Pending {
            return AnswerOutcome::Ignored;
        }
        if value == challenge.correct_answer {
            challenge.stage = ChallengeStage::Armed;
            AnswerOutcome::Correct {
                points: kind.answer_points(),
            }
        } else {
            AnswerOutcome::Wrong
        }
    }

    /// Scroll the challenge left by `distance`
    pub fn advance(&mut self, distance: f32) {
        if let Some(challenge) = self.active.as_mut() {
            if !challenge.is_passed() {
                challenge.world_x -= distance;
            }
        }
    }

    /// Fire the armed dodge once the player is free and the hazard is in the
    /// trigger window. Returns the kind fired.
    pub fn try_fire_dodge(
        &mut self,
        physics: &Physics,
        player: &mut PlayerState,
        trigger_distance: f32,
    ) -> Option<ChallengeKind> {
        let challenge = self.active.as_mut()?;
        if !challenge.is_armed() || !player.is_grounded() {
            return None;
        }
        let gap = challenge.gap_to(player.x);
        if gap <= 0.0 || gap >= trigger_distance {
            return None;
        }
        let fired = match challenge.kind {
            ChallengeKind::Jump => physics.trigger_jump(player),
            ChallengeKind::Slide => physics.trigger_crouch(player),
        };
        if !fired {
            return None;
        }
        challenge.stage = ChallengeStage::Resolved;
        Some(challenge.kind)
    }

    /// Retire the challenge once it is behind `retire_x`. Returns the retired
    /// challenge's id the one time it happens.
    pub fn retire_if_behind(&mut self, retire_x: f32) -> Option<u32> {
        let challenge = self.active.as_mut()?;
        if challenge.is_passed() || challenge.world_x >= retire_x {
            return None;
        }
        challenge.stage = ChallengeStage::Retired;
        Some(challenge.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    fn challenge(kind: ChallengeKind, world_x: f32) -> Challenge {
        Challenge {
            id: 9,
            kind,
            prompt: "agua".into(),
            correct_answer: "water".into(),
            options: vec!["sun".into(), "water".into(), "book".into()],
            world_x,
            stage: ChallengeStage::Pending,
        }
    }

    fn setup(kind: ChallengeKind, world_x: f32) -> (ChallengeLifecycle, Physics, PlayerState) {
        let physics = Physics::from_settings(&Settings::default());
        let player = physics.spawn_player();
        let mut lifecycle = ChallengeLifecycle::new();
        lifecycle.install(challenge(kind, world_x));
        (lifecycle, physics, player)
    }

    #[test]
    fn test_correct_answer_arms() {
        let (mut lifecycle, _, _) = setup(ChallengeKind::Slide, 600.0);
        assert_eq!(
            lifecycle.submit_answer(ChallengeKind::Slide, "water"),
            AnswerOutcome::Correct { points: 50 }
        );
        assert!(lifecycle.active().unwrap().is_armed());
        // Second submission is not scored again
        assert_eq!(
            lifecycle.submit_answer(ChallengeKind::Slide, "water"),
            AnswerOutcome::Ignored
        );
    }

    #[test]
    fn test_wrong_answer_does_not_transition() {
        let (mut lifecycle, _, _) = setup(ChallengeKind::Jump, 600.0);
        assert_eq!(
            lifecycle.submit_answer(ChallengeKind::Jump, "sun"),
            AnswerOutcome::Wrong
        );
        assert_eq!(lifecycle.active().unwrap().stage, ChallengeStage::Pending);
    }

    #[test]
    fn test_mismatched_kind_is_ignored() {
        let (mut lifecycle, _, _) = setup(ChallengeKind::Jump, 600.0);
        assert_eq!(
            lifecycle.submit_answer(ChallengeKind::Slide, "water"),
            AnswerOutcome::Ignored
        );
        assert_eq!(
            lifecycle.submit_answer(ChallengeKind::Slide, "sun"),
            AnswerOutcome::Ignored
        );
        assert_eq!(lifecycle.active().unwrap().stage, ChallengeStage::Pending);
    }

    #[test]
    fn test_no_challenge_ignores_answers() {
        let mut lifecycle = ChallengeLifecycle::new();
        assert!(lifecycle.needs_replacement());
        assert_eq!(
            lifecycle.submit_answer(ChallengeKind::Jump, "x"),
            AnswerOutcome::Ignored
        );
    }

    #[test]
    fn test_armed_slide_fires_in_window() {
        let (mut lifecycle, physics, mut player) = setup(ChallengeKind::Slide, 200.0);
        lifecycle.submit_answer(ChallengeKind::Slide, "water");
        // gap = 100, inside the 150 window
        let fired = lifecycle.try_fire_dodge(&physics, &mut player, 150.0);
        assert_eq!(fired, Some(ChallengeKind::Slide));
        assert!(player.is_crouching());
        let c = lifecycle.active().unwrap();
        assert_eq!(c.stage, ChallengeStage::Resolved);
        assert!(c.is_resolved() && !c.is_armed());
    }

    #[test]
    fn test_armed_waits_outside_window() {
        let (mut lifecycle, physics, mut player) = setup(ChallengeKind::Jump, 400.0);
        lifecycle.submit_answer(ChallengeKind::Jump, "water");
        assert_eq!(lifecycle.try_fire_dodge(&physics, &mut player, 150.0), None);
        assert!(player.is_grounded());

        lifecycle.advance(200.0);
        assert_eq!(
            lifecycle.try_fire_dodge(&physics, &mut player, 150.0),
            Some(ChallengeKind::Jump)
        );
        assert!(player.is_airborne());
    }

    #[test]
    fn test_armed_waits_for_busy_player() {
        let (mut lifecycle, physics, mut player) = setup(ChallengeKind::Jump, 200.0);
        lifecycle.submit_answer(ChallengeKind::Jump, "water");
        physics.trigger_crouch(&mut player);
        assert_eq!(lifecycle.try_fire_dodge(&physics, &mut player, 150.0), None);
        assert!(lifecycle.active().unwrap().is_armed());
    }

    #[test]
    fn test_pending_never_fires() {
        let (mut lifecycle, physics, mut player) = setup(ChallengeKind::Jump, 200.0);
        assert_eq!(lifecycle.try_fire_dodge(&physics, &mut player, 150.0), None);
        assert!(player.is_grounded());
    }

    #[test]
    fn test_hazard_behind_player_does_not_fire() {
        let (mut lifecycle, physics, mut player) = setup(ChallengeKind::Jump, 90.0);
        lifecycle.submit_answer(ChallengeKind::Jump, "water");
        assert_eq!(lifecycle.try_fire_dodge(&physics, &mut player, 150.0), None);
    }

    #[test]
    fn test_retirement_happens_once() {
        let (mut lifecycle, _, _) = setup(ChallengeKind::Jump, -150.0);
        assert_eq!(lifecycle.retire_if_behind(-200.0), None);
        lifecycle.advance(60.0);
        assert_eq!(lifecycle.retire_if_behind(-200.0), Some(9));
        assert!(lifecycle.needs_replacement());

        lifecycle.advance(60.0);
        assert_eq!(lifecycle.active().unwrap().world_x, -210.0);
        assert_eq!(lifecycle.retire_if_behind(-200.0), None);
    }
}
