//! Scripted CPU controller.
//!
//! The policy is a pure function of the horizontal distance to the target and
//! whether the CPU is grounded, plus an injected random source. Each random
//! trial is an independent per-tick draw; attempts made while on cooldown are
//! simply discarded by `Fighter::try_attack`.

use brawler_core::commands::AttackKind;
use rand::Rng;

use crate::fighter::{Fighter, Intent};

/// Beyond this distance the CPU closes in.
pub const APPROACH_DISTANCE: f32 = 100.0;
/// Inside this distance the CPU backs off.
pub const RETREAT_DISTANCE: f32 = 70.0;
/// Inside this distance the CPU considers attacking.
pub const ATTACK_DISTANCE: f32 = 95.0;
pub const APPROACH_SPEED_FACTOR: f32 = 0.9;
pub const RETREAT_SPEED_FACTOR: f32 = 0.55;
/// Per-tick jump probability while grounded.
pub const JUMP_CHANCE: f64 = 0.006;
/// Per-tick attack probability while in attack distance.
pub const ATTACK_CHANCE: f64 = 0.065;
/// Probability that an attempted attack is a kick rather than a jab.
pub const KICK_CHANCE: f64 = 0.45;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Approach,
    Retreat,
    Hold,
}

/// One tick's worth of CPU decisions, independent of fighter stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub movement: Movement,
    pub jump: bool,
    pub attack: Option<AttackKind>,
}

/// Decide what to do given `distance = target_x - own_x`.
pub fn decide<R: Rng + ?Sized>(distance: f32, on_ground: bool, rng: &mut R) -> Decision {
    let abs = distance.abs();
    let movement = if abs > APPROACH_DISTANCE {
        Movement::Approach
    } else if abs < RETREAT_DISTANCE {
        Movement::Retreat
    } else {
        Movement::Hold
    };

    let jump = on_ground && rng.random::<f64>() < JUMP_CHANCE;

    let attack = if abs < ATTACK_DISTANCE && rng.random::<f64>() < ATTACK_CHANCE {
        if rng.random::<f64>() < KICK_CHANCE {
            Some(AttackKind::Kick)
        } else {
            Some(AttackKind::Jab)
        }
    } else {
        None
    };

    Decision {
        movement,
        jump,
        attack,
    }
}

/// Turn a decision into an intent for a fighter with `base_speed`.
pub fn intent_for(decision: &Decision, distance: f32, base_speed: f32) -> Intent {
    let toward = sign(distance);
    let vx = match decision.movement {
        Movement::Approach => toward * base_speed * APPROACH_SPEED_FACTOR,
        Movement::Retreat => -toward * base_speed * RETREAT_SPEED_FACTOR,
        Movement::Hold => 0.0,
    };
    Intent {
        vx,
        jump: decision.jump,
        attack: decision.attack,
    }
}

/// Full policy step for the CPU fighter chasing `target_x`.
///
/// Skipped entirely while stunned: no random draws, no intent.
pub fn drive<R: Rng + ?Sized>(cpu: &Fighter, target_x: f32, rng: &mut R) -> Option<Intent> {
    if cpu.is_stunned() {
        return None;
    }
    let distance = target_x - cpu.x;
    let decision = decide(distance, cpu.on_ground(), rng);
    Some(intent_for(&decision, distance, cpu.archetype.speed))
}

/// Sign with an exact zero, unlike `f32::signum`.
fn sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}
