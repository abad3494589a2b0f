//! Collision detection between the player and challenge hazards
//!
//! Everything is axis-aligned in the logical coordinate space (y down).
//! Jump hazards are gaps in the ground, slide hazards are raised obstacles.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::challenge::{Challenge, ChallengeKind};
use super::physics::PlayerState;
use crate::settings::Settings;

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + width, y + height),
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Open-interval overlap on x (touching edges do not count)
    pub fn overlaps_x(&self, other: &Rect) -> bool {
        self.max.x > other.min.x && self.min.x < other.max.x
    }

    /// Open-interval overlap on y
    pub fn overlaps_y(&self, other: &Rect) -> bool {
        self.max.y > other.min.y && self.min.y < other.max.y
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.overlaps_x(other) && self.overlaps_y(other)
    }
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FatalCause {
    /// Stood on the ground over a gap
    FellInGap,
    /// Ran into an obstacle standing up
    HitObstacle,
    /// Picked a wrong option
    WrongAnswer,
}

/// Hazard rectangle of a challenge at its current position
pub fn hazard_rect(kind: ChallengeKind, world_x: f32, settings: &Settings) -> Rect {
    let surface = settings.ground_surface_y();
    match kind {
        ChallengeKind::Jump => {
            Rect::from_xywh(world_x, surface, settings.gap_width, settings.gap_depth)
        }
        ChallengeKind::Slide => Rect::from_xywh(
            world_x,
            surface - settings.obstacle_height,
            settings.obstacle_width,
            settings.obstacle_height,
        ),
    }
}

/// Check whether the player dies against this challenge this tick.
///
/// Returns `None` once the challenge has been cleared by a correct answer:
/// a granted dodge overrides geometry for the rest of the challenge's life.
pub fn check_hazard(
    player: &PlayerState,
    player_box: &Rect,
    challenge: &Challenge,
    settings: &Settings,
) -> Option<FatalCause> {
    if challenge.is_cleared() {
        return None;
    }
    let hazard = hazard_rect(challenge.kind, challenge.world_x, settings);
    if !player_box.overlaps_x(&hazard) {
        return None;
    }
    match challenge.kind {
        ChallengeKind::Jump => {
            // Falling in only happens from ground level
            let grounded = !player.is_airborne() && player.y >= settings.ground_y;
            grounded.then_some(FatalCause::FellInGap)
        }
        ChallengeKind::Slide => {
            let hit = player_box.overlaps_y(&hazard) && !player.is_crouching();
            hit.then_some(FatalCause::HitObstacle)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::challenge::ChallengeStage;
    use crate::sim::physics::Physics;

    fn challenge(kind: ChallengeKind, world_x: f32) -> Challenge {
        Challenge {
            id: 1,
            kind,
            prompt: "hello".into(),
            correct_answer: "hola".into(),
            options: vec!["hola".into(), "agua".into(), "sol".into()],
            world_x,
            stage: ChallengeStage::Pending,
        }
    }

    #[test]
    fn test_rect_overlap_edges() {
        let a = Rect::from_xywh(0.0, 0.0, 10.0, 10.0);
        let touching = Rect::from_xywh(10.0, 0.0, 10.0, 10.0);
        let inside = Rect::from_xywh(5.0, 5.0, 2.0, 2.0);
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&inside));
        assert_eq!(a.width(), 10.0);
        assert_eq!(a.height(), 10.0);
    }

    #[test]
    fn test_grounded_over_gap_is_fatal() {
        let settings = Settings::default();
        let physics = Physics::from_settings(&settings);
        let player = physics.spawn_player();
        let gap = challenge(ChallengeKind::Jump, 110.0);
        let cause = check_hazard(&player, &physics.hitbox(&player), &gap, &settings);
        assert_eq!(cause, Some(FatalCause::FellInGap));
    }

    #[test]
    fn test_airborne_over_gap_is_safe() {
        let settings = Settings::default();
        let physics = Physics::from_settings(&settings);
        let mut player = physics.spawn_player();
        physics.trigger_jump(&mut player);
        physics.step(&mut player, 1.0 / 60.0);
        let gap = challenge(ChallengeKind::Jump, 110.0);
        assert_eq!(check_hazard(&player, &physics.hitbox(&player), &gap, &settings), None);
    }

    #[test]
    fn test_gap_not_yet_reached() {
        let settings = Settings::default();
        let physics = Physics::from_settings(&settings);
        let player = physics.spawn_player();
        // Player spans 100..140, gap starts exactly at the trailing edge
        let gap = challenge(ChallengeKind::Jump, 140.0);
        assert_eq!(check_hazard(&player, &physics.hitbox(&player), &gap, &settings), None);
    }

    #[test]
    fn test_standing_into_obstacle_is_fatal() {
        let settings = Settings::default();
        let physics = Physics::from_settings(&settings);
        let player = physics.spawn_player();
        let wall = challenge(ChallengeKind::Slide, 120.0);
        let cause = check_hazard(&player, &physics.hitbox(&player), &wall, &settings);
        assert_eq!(cause, Some(FatalCause::HitObstacle));
    }

    #[test]
    fn test_crouching_under_obstacle_is_safe() {
        let settings = Settings::default();
        let physics = Physics::from_settings(&settings);
        let mut player = physics.spawn_player();
        physics.trigger_crouch(&mut player);
        let wall = challenge(ChallengeKind::Slide, 120.0);
        assert_eq!(check_hazard(&player, &physics.hitbox(&player), &wall, &settings), None);
    }

    #[test]
    fn test_cleared_challenge_never_collides() {
        let settings = Settings::default();
        let physics = Physics::from_settings(&settings);
        let player = physics.spawn_player();
        let mut gap = challenge(ChallengeKind::Jump, 110.0);
        gap.stage = ChallengeStage::Armed;
        assert_eq!(check_hazard(&player, &physics.hitbox(&player), &gap, &settings), None);
        gap.stage = ChallengeStage::Resolved;
        assert_eq!(check_hazard(&player, &physics.hitbox(&player), &gap, &settings), None);
    }

    #[test]
    fn test_hazard_geometry() {
        let settings = Settings::default();
        let gap = hazard_rect(ChallengeKind::Jump, 500.0, &settings);
        assert_eq!(gap.min, Vec2::new(500.0, 400.0));
        assert_eq!(gap.width(), settings.gap_width);

        let wall = hazard_rect(ChallengeKind::Slide, 500.0, &settings);
        assert_eq!(wall.max.y, 400.0);
        assert_eq!(wall.height(), settings.obstacle_height);
    }
}
