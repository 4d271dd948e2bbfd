//! Scripted driver for the human side in headless runs.
//!
//! Reuses the CPU policy but expresses its decision as held flags plus an
//! attack key-down, so it travels the same input path a player would.

use brawler_core::commands::{AttackKind, CommandFlags};
use brawler_sim::Fighter;
use brawler_sim::opponent::{self, Movement};
use rand::Rng;

/// Input produced for one tick. Attacks travel only through `press`; the
/// attack flags stay clear.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutopilotInput {
    pub flags: CommandFlags,
    /// Attack key pressed this tick, if any.
    pub press: Option<AttackKind>,
}

/// Decide this tick's input for `pilot` fighting `target`.
pub fn steer<R: Rng + ?Sized>(pilot: &Fighter, target: &Fighter, rng: &mut R) -> AutopilotInput {
    let distance = target.x - pilot.x;
    let decision = opponent::decide(distance, pilot.on_ground(), rng);

    let target_is_right = distance > 0.0;
    let (left, right) = match decision.movement {
        Movement::Approach => (!target_is_right, target_is_right),
        Movement::Retreat => (target_is_right, !target_is_right),
        Movement::Hold => (false, false),
    };

    AutopilotInput {
        flags: CommandFlags {
            left,
            right,
            jump: decision.jump,
            ..CommandFlags::default()
        },
        press: decision.attack,
    }
}
