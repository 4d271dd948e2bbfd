use brawler_core::commands::AttackKind;
use brawler_core::roster::Archetype;
use brawler_core::view::{Facing, FighterView, Pose, Rect};

use crate::attack::{ATTACK_BOX_TTL, AttackBox, AttackProfile};

/// Downward acceleration (units/tick^2).
pub const GRAVITY: f32 = 0.75;
/// Y coordinate of the floor line; `y` grows downward.
pub const FLOOR_Y: f32 = 455.0;
/// Arena width in world units.
pub const ARENA_WIDTH: f32 = 960.0;
/// Distance of the hard walls from the arena edges.
pub const WALL_MARGIN: f32 = 20.0;
/// Hit points every fighter starts a round with.
pub const MAX_HP: i32 = 100;
/// Horizontal speed above which a grounded fighter shows the run pose.
const RUN_POSE_THRESHOLD: f32 = 0.45;

/// Movement/attack intent for one tick, produced by the input translator or
/// the CPU policy.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Intent {
    pub vx: f32,
    pub jump: bool,
    pub attack: Option<AttackKind>,
}

/// Physical and combat state of one combatant.
#[derive(Debug, Clone, PartialEq)]
pub struct Fighter {
    pub archetype: &'static Archetype,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub facing: Facing,
    /// Remaining hit points. May dip below zero on the knockout hit.
    pub hp: i32,
    pub attack_cooldown: u32,
    pub hit_flash: u32,
    pub stun: u32,
    pub attack_anim: u32,
    pub active_attack: Option<AttackKind>,
    pub attack_box: Option<AttackBox>,
    /// Damage multiplier in `[1.0, 1.45]`, grown by landed hits.
    pub combo_mult: f32,
}

impl Fighter {
    /// Spawn a fresh fighter standing on the floor at `x`.
    pub fn new(archetype: &'static Archetype, x: f32, facing: Facing) -> Self {
        Self {
            archetype,
            x,
            y: FLOOR_Y - archetype.height,
            vx: 0.0,
            vy: 0.0,
            facing,
            hp: MAX_HP,
            attack_cooldown: 0,
            hit_flash: 0,
            stun: 0,
            attack_anim: 0,
            active_attack: None,
            attack_box: None,
            combo_mult: 1.0,
        }
    }

    pub fn name(&self) -> &'static str {
        self.archetype.name
    }

    pub fn width(&self) -> f32 {
        self.archetype.width
    }

    pub fn height(&self) -> f32 {
        self.archetype.height
    }

    pub fn body(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: self.width(),
            height: self.height(),
        }
    }

    pub fn on_ground(&self) -> bool {
        self.y + self.height() >= FLOOR_Y
    }

    pub fn is_stunned(&self) -> bool {
        self.stun > 0
    }

    /// Advance timers and physics by one tick.
    pub fn update(&mut self) {
        self.attack_cooldown = self.attack_cooldown.saturating_sub(1);
        self.hit_flash = self.hit_flash.saturating_sub(1);
        self.stun = self.stun.saturating_sub(1);
        self.attack_anim = self.attack_anim.saturating_sub(1);
        if self.attack_anim == 0 {
            self.active_attack = None;
        }

        self.vy += GRAVITY;
        self.x += self.vx;
        self.y += self.vy;

        if self.y + self.height() >= FLOOR_Y {
            self.y = FLOOR_Y - self.height();
            self.vy = 0.0;
        }

        if self.x < WALL_MARGIN {
            self.x = WALL_MARGIN;
        }
        if self.x + self.width() > ARENA_WIDTH - WALL_MARGIN {
            self.x = ARENA_WIDTH - self.width() - WALL_MARGIN;
        }
    }

    /// Throw an attack unless recovering or stunned.
    ///
    /// Returns `true` if the attack was thrown. A thrown attack replaces any
    /// live attack box and consumes the combo multiplier.
    pub fn try_attack(&mut self, kind: AttackKind) -> bool {
        if self.attack_cooldown > 0 || self.stun > 0 {
            return false;
        }

        let profile = AttackProfile::of(kind);
        let damage =
            (profile.base_damage * (self.archetype.power / 10.0) * self.combo_mult).round() as i32;
        let x = match self.facing {
            Facing::Right => self.x + self.width(),
            Facing::Left => self.x - profile.range,
        };

        self.attack_box = Some(AttackBox {
            kind,
            rect: Rect {
                x,
                y: self.y + profile.y_offset,
                width: profile.range,
                height: profile.height,
            },
            damage,
            ttl: ATTACK_BOX_TTL,
        });
        self.attack_cooldown = profile.cooldown;
        self.attack_anim = profile.anim;
        self.active_attack = Some(kind);
        self.combo_mult = 1.0;
        true
    }

    /// Apply a movement intent: velocity, sticky facing, grounded jump, attack.
    pub fn apply_intent(&mut self, intent: &Intent) {
        self.vx = intent.vx;
        if let Some(facing) = Facing::from_velocity(self.vx) {
            self.facing = facing;
        }
        if intent.jump && self.on_ground() {
            self.vy = -self.archetype.jump;
        }
        if let Some(kind) = intent.attack {
            self.try_attack(kind);
        }
    }

    pub fn pose(&self) -> Pose {
        if self.stun > 0 {
            return Pose::Hit;
        }
        if !self.on_ground() {
            return Pose::Jump;
        }
        if self.attack_anim > 0 {
            return match self.active_attack {
                Some(AttackKind::Kick) => Pose::Kick,
                Some(AttackKind::Jab) | None => Pose::Jab,
            };
        }
        if self.vx.abs() > RUN_POSE_THRESHOLD {
            return Pose::Run;
        }
        Pose::Idle
    }

    pub fn view(&self, label: String) -> FighterView {
        FighterView {
            label,
            color: self.archetype.color,
            body: self.body(),
            facing: self.facing,
            on_ground: self.on_ground(),
            pose: self.pose(),
            flashing: self.hit_flash > 0,
            attack_box: self.attack_box.as_ref().map(|b| b.rect),
        }
    }
}

#[cfg(test)]
mod tests {
    use brawler_core::roster::ROSTER;

    use super::*;

    fn elmo() -> Fighter {
        Fighter::new(&ROSTER[0], 160.0, Facing::Right)
    }

    #[test]
    fn spawns_standing_on_floor() {
        let f = elmo();
        assert!(f.on_ground());
        assert_eq!(f.y + f.height(), FLOOR_Y);
        assert_eq!(f.hp, MAX_HP);
        assert_eq!(f.combo_mult, 1.0);
    }

    #[test]
    fn grounded_fighter_stays_grounded() {
        let mut f = elmo();
        f.update();
        assert!(f.on_ground());
        assert_eq!(f.vy, 0.0);
    }

    #[test]
    fn jump_leaves_ground_then_lands() {
        let mut f = elmo();
        f.apply_intent(&Intent {
            jump: true,
            ..Default::default()
        });
        assert_eq!(f.vy, -15.0);
        f.update();
        assert!(!f.on_ground());
        assert_eq!(f.pose(), Pose::Jump);

        for _ in 0..60 {
            f.update();
        }
        assert!(f.on_ground());
        assert_eq!(f.vy, 0.0);
    }

    #[test]
    fn airborne_jump_is_ignored() {
        let mut f = elmo();
        f.y -= 50.0;
        f.vy = 2.0;
        f.apply_intent(&Intent {
            jump: true,
            ..Default::default()
        });
        assert_eq!(f.vy, 2.0);
    }

    #[test]
    fn left_wall_clamps_position() {
        let mut f = elmo();
        f.x = 20.0;
        f.vx = -5.0;
        f.update();
        assert_eq!(f.x, 20.0);
    }

    #[test]
    fn right_wall_clamps_position() {
        let mut f = elmo();
        f.x = ARENA_WIDTH - f.width() - 22.0;
        f.vx = 10.0;
        f.update();
        assert_eq!(f.x, ARENA_WIDTH - f.width() - WALL_MARGIN);
    }

    #[test]
    fn timers_count_down_and_clear_attack_marker() {
        let mut f = elmo();
        assert!(f.try_attack(AttackKind::Jab));
        assert_eq!(f.attack_anim, 9);
        for _ in 0..9 {
            f.update();
        }
        assert_eq!(f.attack_anim, 0);
        assert_eq!(f.active_attack, None);
        assert_eq!(f.attack_cooldown, 22 - 9);
    }

    #[test]
    fn jab_damage_at_neutral_power() {
        let mut f = Fighter::new(&ROSTER[2], 160.0, Facing::Right);
        assert_eq!(f.archetype.power, 10.0);
        f.try_attack(AttackKind::Jab);
        assert_eq!(f.attack_box.unwrap().damage, 9);
    }

    #[test]
    fn kick_damage_scales_with_power() {
        let mut f = Fighter::new(&ROSTER[1], 160.0, Facing::Right);
        assert_eq!(f.archetype.power, 11.0);
        f.try_attack(AttackKind::Kick);
        assert_eq!(f.attack_box.unwrap().damage, 14);
        assert_eq!(f.attack_cooldown, 34);
        assert_eq!(f.attack_anim, 12);
    }

    #[test]
    fn combo_bonus_is_consumed_by_next_attack() {
        let mut f = Fighter::new(&ROSTER[2], 160.0, Facing::Right);
        f.combo_mult = 1.24;
        f.try_attack(AttackKind::Kick);
        // 13 * 1.0 * 1.24 = 16.12
        assert_eq!(f.attack_box.unwrap().damage, 16);
        assert_eq!(f.combo_mult, 1.0);
    }

    #[test]
    fn attack_box_placed_in_front() {
        let mut right = elmo();
        right.try_attack(AttackKind::Jab);
        let b = right.attack_box.unwrap();
        assert_eq!(b.rect.x, 160.0 + 70.0);
        assert_eq!(b.rect.width, 52.0);
        assert_eq!(b.rect.y, right.y + 28.0);
        assert_eq!(b.ttl, ATTACK_BOX_TTL);

        let mut left = Fighter::new(&ROSTER[0], 500.0, Facing::Left);
        left.try_attack(AttackKind::Kick);
        let b = left.attack_box.unwrap();
        assert_eq!(b.rect.x, 500.0 - 70.0);
        assert_eq!(b.rect.height, 30.0);
        assert_eq!(b.rect.y, left.y + 42.0);
    }

    #[test]
    fn cooldown_blocks_attack() {
        let mut f = elmo();
        f.combo_mult = 1.16;
        f.attack_cooldown = 3;
        assert!(!f.try_attack(AttackKind::Jab));
        assert!(f.attack_box.is_none());
        assert_eq!(f.combo_mult, 1.16);
    }

    #[test]
    fn stun_blocks_attack() {
        let mut f = elmo();
        f.stun = 1;
        assert!(!f.try_attack(AttackKind::Kick));
        assert!(f.attack_box.is_none());
    }

    #[test]
    fn facing_is_sticky() {
        let mut f = elmo();
        f.apply_intent(&Intent {
            vx: -4.8,
            ..Default::default()
        });
        assert_eq!(f.facing, Facing::Left);
        f.apply_intent(&Intent::default());
        assert_eq!(f.facing, Facing::Left);
        assert_eq!(f.vx, 0.0);
    }

    #[test]
    fn pose_priority() {
        let mut f = elmo();
        assert_eq!(f.pose(), Pose::Idle);
        f.vx = 0.5;
        assert_eq!(f.pose(), Pose::Run);
        f.try_attack(AttackKind::Kick);
        assert_eq!(f.pose(), Pose::Kick);
        f.active_attack = None;
        assert_eq!(f.pose(), Pose::Jab);
        f.y -= 10.0;
        assert_eq!(f.pose(), Pose::Jump);
        f.stun = 3;
        assert_eq!(f.pose(), Pose::Hit);
    }

    #[test]
    fn view_exposes_attack_box_and_flash() {
        let mut f = elmo();
        f.hit_flash = 2;
        f.try_attack(AttackKind::Jab);
        let v = f.view("Elmo".to_string());
        assert!(v.flashing);
        assert_eq!(v.attack_box, f.attack_box.map(|b| b.rect));
        assert_eq!(v.pose, Pose::Jab);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn timers_never_underflow_and_x_stays_in_bounds(
                archetype in 0usize..6,
                velocities in proptest::collection::vec(-40.0f32..40.0, 1..200),
                jumps in proptest::collection::vec(any::<bool>(), 1..200),
                stun in 0u32..20,
            ) {
                let a = &ROSTER[archetype];
                let mut f = Fighter::new(a, 400.0, Facing::Right);
                f.stun = stun;
                f.try_attack(AttackKind::Kick);

                for (i, &vx) in velocities.iter().enumerate() {
                    let jump = jumps.get(i).copied().unwrap_or(false);
                    f.apply_intent(&Intent { vx, jump, attack: None });
                    f.update();

                    prop_assert!(f.x >= WALL_MARGIN);
                    prop_assert!(f.x <= ARENA_WIDTH - a.width - WALL_MARGIN);
                    prop_assert!(f.y + a.height <= FLOOR_Y);
                    prop_assert!(f.active_attack.is_none() || f.attack_anim > 0);
                }
            }

            #[test]
            fn gated_attacks_never_touch_box_or_combo(
                cooldown in 0u32..40,
                stun in 0u32..12,
                combo in 1.0f32..=1.45,
                kick in any::<bool>(),
            ) {
                prop_assume!(cooldown > 0 || stun > 0);
                let mut f = Fighter::new(&ROSTER[0], 300.0, Facing::Left);
                f.attack_cooldown = cooldown;
                f.stun = stun;
                f.combo_mult = combo;
                let kind = if kick { AttackKind::Kick } else { AttackKind::Jab };

                prop_assert!(!f.try_attack(kind));
                prop_assert!(f.attack_box.is_none());
                prop_assert_eq!(f.combo_mult, combo);
            }
        }
    }
}
