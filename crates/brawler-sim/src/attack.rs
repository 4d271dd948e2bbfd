use brawler_core::commands::AttackKind;
use brawler_core::view::Rect;

use crate::fighter::Fighter;

/// Ticks an attack box stays live before expiring unused.
pub const ATTACK_BOX_TTL: u32 = 8;
/// Hit-flash ticks applied to a struck defender.
pub const HIT_FLASH_TICKS: u32 = 5;
/// Stun ticks applied to a struck defender.
pub const HIT_STUN_TICKS: u32 = 10;
/// Horizontal knockback speed, in the attacker's facing direction.
pub const KNOCKBACK_X: f32 = 4.5;
/// Upward knockback speed.
pub const KNOCKBACK_Y: f32 = 3.5;
/// Combo multiplier gained per landed hit.
pub const COMBO_STEP: f32 = 0.08;
/// Combo multiplier ceiling.
pub const COMBO_MAX: f32 = 1.45;

/// Static per-kind attack parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackProfile {
    pub range: f32,
    pub y_offset: f32,
    pub height: f32,
    pub base_damage: f32,
    pub cooldown: u32,
    pub anim: u32,
}

impl AttackProfile {
    pub const JAB: AttackProfile = AttackProfile {
        range: 52.0,
        y_offset: 28.0,
        height: 24.0,
        base_damage: 9.0,
        cooldown: 22,
        anim: 9,
    };

    pub const KICK: AttackProfile = AttackProfile {
        range: 70.0,
        y_offset: 42.0,
        height: 30.0,
        base_damage: 13.0,
        cooldown: 34,
        anim: 12,
    };

    pub fn of(kind: AttackKind) -> AttackProfile {
        match kind {
            AttackKind::Jab => Self::JAB,
            AttackKind::Kick => Self::KICK,
        }
    }
}

/// A live hit region owned by the fighter that threw it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackBox {
    pub kind: AttackKind,
    pub rect: Rect,
    pub damage: i32,
    pub ttl: u32,
}

/// Result of an attack connecting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub kind: AttackKind,
    pub damage: i32,
    pub defender_hp: i32,
}

/// Age the attacker's live box by one tick and apply it to the defender.
///
/// Called once per ordered pair per tick. Stunned defenders are passed
/// through: the box keeps living until it expires or hits later.
pub fn resolve(attacker: &mut Fighter, defender: &mut Fighter) -> Option<Hit> {
    let attack = attacker.attack_box.as_mut()?;
    attack.ttl = attack.ttl.saturating_sub(1);
    if attack.ttl == 0 {
        attacker.attack_box = None;
        return None;
    }

    if defender.stun > 0 || !attack.rect.intersects(&defender.body()) {
        return None;
    }

    let (kind, damage) = (attack.kind, attack.damage);
    attacker.attack_box = None;

    defender.hp -= damage;
    defender.hit_flash = HIT_FLASH_TICKS;
    defender.stun = HIT_STUN_TICKS;
    defender.vx = attacker.facing.sign() * KNOCKBACK_X;
    defender.vy = -KNOCKBACK_Y;

    attacker.combo_mult = (attacker.combo_mult + COMBO_STEP).min(COMBO_MAX);

    Some(Hit {
        kind,
        damage,
        defender_hp: defender.hp,
    })
}
