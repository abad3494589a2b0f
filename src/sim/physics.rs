//! Player vertical physics
//!
//! The player never moves horizontally; the world scrolls past. Vertically the
//! player is either standing, in a jump arc, or crouched for a fixed time.

use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::settings::Settings;

/// What the player's body is doing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlayerPose {
    /// Standing on the ground
    Grounded,
    /// In a jump arc
    Airborne,
    /// Sliding low; returns to `Grounded` when `remaining` (seconds) runs out
    Crouching { remaining: f32 },
}

/// Player state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Left edge (constant during a run)
    pub x: f32,
    /// Top edge of the standing hitbox
    pub y: f32,
    /// Vertical velocity (negative is up)
    pub vel_y: f32,
    pub pose: PlayerPose,
}

impl PlayerState {
    pub fn is_airborne(&self) -> bool {
        matches!(self.pose, PlayerPose::Airborne)
    }

    pub fn is_crouching(&self) -> bool {
        matches!(self.pose, PlayerPose::Crouching { .. })
    }

    /// Free to start a dodge
    pub fn is_grounded(&self) -> bool {
        matches!(self.pose, PlayerPose::Grounded)
    }
}

/// Fixed-parameter integrator for `PlayerState`
#[derive(Debug, Clone, PartialEq)]
pub struct Physics {
    pub gravity: f32,
    pub jump_velocity: f32,
    pub crouch_duration: f32,
    pub ground_y: f32,
    pub player_x: f32,
    pub width: f32,
    pub height: f32,
}

impl Physics {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            gravity: settings.gravity,
            jump_velocity: settings.jump_velocity,
            crouch_duration: settings.crouch_duration,
            ground_y: settings.ground_y,
            player_x: settings.player_x,
            width: settings.player_width,
            height: settings.player_height,
        }
    }

    /// A standing player at the start position
    pub fn spawn_player(&self) -> PlayerState {
        PlayerState {
            x: self.player_x,
            y: self.ground_y,
            vel_y: 0.0,
            pose: PlayerPose::Grounded,
        }
    }

    /// Start a jump. No-op unless the player is standing.
    pub fn trigger_jump(&self, player: &mut PlayerState) -> bool {
        if !player.is_grounded() {
            return false;
        }
        player.vel_y = self.jump_velocity;
        player.pose = PlayerPose::Airborne;
        true
    }

    /// Start a slide. No-op unless the player is standing.
    pub fn trigger_crouch(&self, player: &mut PlayerState) -> bool {
        if !player.is_grounded() {
            return false;
        }
        player.pose = PlayerPose::Crouching {
            remaining: self.crouch_duration,
        };
        true
    }

    /// Advance by `dt` seconds
    pub fn step(&self, player: &mut PlayerState, dt: f32) {
        match player.pose {
            PlayerPose::Airborne => {
                player.vel_y += self.gravity * dt;
                player.y += player.vel_y * dt;
                if player.y >= self.ground_y {
                    // Land exactly on the ground, no bounce
                    player.y = self.ground_y;
                    player.vel_y = 0.0;
                    player.pose = PlayerPose::Grounded;
                }
            }
            PlayerPose::Crouching { remaining } => {
                let remaining = remaining - dt;
                player.pose = if remaining <= 0.0 {
                    PlayerPose::Grounded
                } else {
                    PlayerPose::Crouching { remaining }
                };
            }
            PlayerPose::Grounded => {
                player.y = self.ground_y;
                player.vel_y = 0.0;
            }
        }
    }

    /// Current hitbox; crouching halves the height and keeps the feet planted
    pub fn hitbox(&self, player: &PlayerState) -> Rect {
        if player.is_crouching() {
            let half = self.height / 2.0;
            Rect::from_xywh(player.x, player.y + half, self.width, half)
        } else {
            Rect::from_xywh(player.x, player.y, self.width, self.height)
        }
    }
}
