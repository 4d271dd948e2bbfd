//! Read-only projections of the simulation for renderers and HUD layers.
//!
//! Nothing in here mutates game state; the simulation fills these structs
//! once per tick and external layers consume them.

use serde::{Deserialize, Serialize};

use crate::roster::FighterColor;

/// Which side of the arena a fighter occupies. Left is the human side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

/// Horizontal facing direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    /// -1.0 for left, +1.0 for right.
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    /// Facing implied by a non-zero horizontal velocity.
    pub fn from_velocity(vx: f32) -> Option<Facing> {
        if vx > 0.0 {
            Some(Facing::Right)
        } else if vx < 0.0 {
            Some(Facing::Left)
        } else {
            None
        }
    }
}

/// Axis-aligned rectangle; `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Strict overlap test: touching edges do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}

/// Animation pose a renderer should show for a fighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pose {
    Idle,
    Run,
    Jump,
    Jab,
    Kick,
    Hit,
}

/// Round/match state machine phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// No match running.
    #[default]
    Idle,
    RoundActive,
    /// Round decided; the next round starts after the restart delay.
    RoundEnding,
    /// A side reached the win threshold. Only a new start leaves this phase.
    MatchOver,
}

/// Per-fighter data a renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FighterView {
    pub label: String,
    pub color: FighterColor,
    pub body: Rect,
    pub facing: Facing,
    pub on_ground: bool,
    pub pose: Pose,
    /// True while the fighter is flashing from a recent hit.
    pub flashing: bool,
    pub attack_box: Option<Rect>,
}

/// HUD values: health bars, timer and round counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub left_name: String,
    pub right_name: String,
    /// Health clamped to `0..=100` for display.
    pub left_hp: u32,
    pub right_hp: u32,
    pub round_timer: u32,
    pub left_rounds: u32,
    pub right_rounds: u32,
    pub phase: Phase,
}

/// Everything the presentation layer consumes for one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub left: FighterView,
    pub right: FighterView,
    pub hud: HudSnapshot,
}

impl FrameSnapshot {
    pub fn fighter(&self, side: Side) -> &FighterView {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f32, y: f32, width: f32, height: f32) -> Rect {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    #[test]
    fn overlapping_rects_intersect() {
        assert!(rect(0.0, 0.0, 10.0, 10.0).intersects(&rect(5.0, 5.0, 10.0, 10.0)));
    }

    #[test]
    fn touching_rects_do_not_intersect() {
        assert!(!rect(0.0, 0.0, 10.0, 10.0).intersects(&rect(10.0, 0.0, 10.0, 10.0)));
        assert!(!rect(0.0, 0.0, 10.0, 10.0).intersects(&rect(0.0, 10.0, 10.0, 10.0)));
    }

    #[test]
    fn facing_from_velocity_is_sticky_at_zero() {
        assert_eq!(Facing::from_velocity(2.0), Some(Facing::Right));
        assert_eq!(Facing::from_velocity(-0.1), Some(Facing::Left));
        assert_eq!(Facing::from_velocity(0.0), None);
    }
}
