use brawler_core::commands::CommandFlags;

use crate::fighter::{Fighter, Intent};

/// Translate the live command flags into a movement intent for `fighter`.
///
/// Returns `None` while the fighter is stunned, leaving knockback velocity
/// untouched. Attacks are edge-triggered and routed separately, so the
/// returned intent never carries one.
pub fn translate(flags: &CommandFlags, fighter: &Fighter) -> Option<Intent> {
    if fighter.is_stunned() {
        return None;
    }
    Some(Intent {
        vx: f32::from(flags.horizontal()) * fighter.archetype.speed,
        jump: flags.jump,
        attack: None,
    })
}
