use brawler_core::commands::{AttackKind, CommandFlags};
use brawler_core::events::{MatchEvent, RoundOutcome};
use brawler_core::roster::{Archetype, ROSTER};
use brawler_core::view::{Facing, FrameSnapshot, HudSnapshot, Phase, Side};
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::attack::{self, Hit};
use crate::fighter::{Fighter, MAX_HP};
use crate::{input, opponent, scoring};

/// Length of a round on the countdown clock.
pub const ROUND_SECS: u32 = 60;
/// Delay between a decided round and the next one.
pub const RESTART_DELAY_SECS: u64 = 2;
pub const LEFT_START_X: f32 = 160.0;
pub const RIGHT_START_X: f32 = 730.0;

/// Cross-round bookkeeping. Survives round restarts; only a new match resets
/// the win counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundState {
    pub round_timer: u32,
    pub left_rounds: u32,
    pub right_rounds: u32,
    /// Identity of the current round. Deferred callbacks carry the id they
    /// were scheduled for and are ignored once it changes.
    pub round_id: u64,
}

/// Orchestrates the per-tick update order and the round/match state machine.
///
/// All mutation goes through `&mut self`; callers own scheduling (tick
/// cadence, countdown, restart delay) and feed results back in.
#[derive(Debug, Clone)]
pub struct RoundController {
    phase: Phase,
    state: RoundState,
    selection: &'static Archetype,
    left: Fighter,
    right: Fighter,
    ticks: u64,
}

impl RoundController {
    pub fn new() -> Self {
        let selection = Archetype::default_pick();
        Self {
            phase: Phase::Idle,
            state: RoundState {
                round_timer: ROUND_SECS,
                left_rounds: 0,
                right_rounds: 0,
                round_id: 0,
            },
            selection,
            left: Fighter::new(selection, LEFT_START_X, Facing::Right),
            right: Fighter::new(selection, RIGHT_START_X, Facing::Left),
            ticks: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn fighter(&self, side: Side) -> &Fighter {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    #[cfg(any(test, feature = "test-helpers"))]
    pub fn fighter_mut(&mut self, side: Side) -> &mut Fighter {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Choose the human archetype used from the next round start on.
    pub fn select(&mut self, archetype: &'static Archetype) {
        tracing::debug!(fighter = archetype.name, "Fighter selected");
        self.selection = archetype;
    }

    /// Start a fresh match from any phase: counters reset, round 1 begins.
    /// Any pending restart or countdown for an earlier round becomes stale.
    pub fn start_match<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<MatchEvent> {
        self.state.left_rounds = 0;
        self.state.right_rounds = 0;
        tracing::info!(fighter = self.selection.name, "Match started");
        vec![self.start_round(rng)]
    }

    /// Deferred restart after a decided round. Ignored unless `round_id` is
    /// the round that just ended and the match is still waiting for it.
    pub fn advance_round<R: Rng + ?Sized>(&mut self, round_id: u64, rng: &mut R) -> Vec<MatchEvent> {
        if self.phase != Phase::RoundEnding || round_id != self.state.round_id {
            tracing::debug!(
                round_id,
                current = self.state.round_id,
                phase = ?self.phase,
                "Ignoring stale round restart"
            );
            return Vec::new();
        }
        vec![self.start_round(rng)]
    }

    /// Stop the match and return to idle. Pending callbacks become stale.
    pub fn abort(&mut self) {
        tracing::info!(round_id = self.state.round_id, phase = ?self.phase, "Match aborted");
        self.phase = Phase::Idle;
        self.state.round_id += 1;
    }

    /// One simulation tick. No-op unless a round is active.
    pub fn tick<R: Rng + ?Sized>(&mut self, flags: &CommandFlags, rng: &mut R) -> Vec<MatchEvent> {
        if self.phase != Phase::RoundActive {
            return Vec::new();
        }
        self.ticks += 1;

        if let Some(intent) = input::translate(flags, &self.left) {
            self.left.apply_intent(&intent);
        }
        if let Some(intent) = opponent::drive(&self.right, self.left.x, rng) {
            self.right.apply_intent(&intent);
        }

        self.left.update();
        self.right.update();

        let mut events = Vec::new();
        if let Some(hit) = attack::resolve(&mut self.left, &mut self.right) {
            events.push(hit_event(Side::Left, hit));
        }
        if let Some(hit) = attack::resolve(&mut self.right, &mut self.left) {
            events.push(hit_event(Side::Right, hit));
        }

        if scoring::round_over(self.left.hp, self.right.hp, self.state.round_timer) {
            events.extend(self.finish_round());
        }
        events
    }

    /// One second of the round countdown for round `round_id`.
    pub fn second_elapsed(&mut self, round_id: u64) -> Vec<MatchEvent> {
        if self.phase != Phase::RoundActive || round_id != self.state.round_id {
            tracing::debug!(round_id, current = self.state.round_id, "Ignoring stale countdown");
            return Vec::new();
        }
        self.state.round_timer = self.state.round_timer.saturating_sub(1);
        if self.state.round_timer == 0 {
            return self.finish_round();
        }
        Vec::new()
    }

    /// Key-down attack edge for the human fighter. Ignored outside an
    /// active round; otherwise subject to the usual cooldown/stun gating.
    pub fn press_attack(&mut self, kind: AttackKind) -> bool {
        if self.phase != Phase::RoundActive {
            return false;
        }
        self.left.try_attack(kind)
    }

    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot {
            left_name: self.label(Side::Left),
            right_name: self.label(Side::Right),
            left_hp: self.left.hp.clamp(0, MAX_HP) as u32,
            right_hp: self.right.hp.clamp(0, MAX_HP) as u32,
            round_timer: self.state.round_timer,
            left_rounds: self.state.left_rounds,
            right_rounds: self.state.right_rounds,
            phase: self.phase,
        }
    }

    pub fn frame(&self) -> FrameSnapshot {
        FrameSnapshot {
            tick: self.ticks,
            left: self.left.view(self.label(Side::Left)),
            right: self.right.view(self.label(Side::Right)),
            hud: self.hud(),
        }
    }

    fn label(&self, side: Side) -> String {
        match side {
            Side::Left => self.left.name().to_string(),
            Side::Right => format!("{} (CPU)", self.right.name()),
        }
    }

    fn start_round<R: Rng + ?Sized>(&mut self, rng: &mut R) -> MatchEvent {
        let cpu_pick = ROSTER.choose(rng).unwrap_or(Archetype::default_pick());

        self.state.round_id += 1;
        self.state.round_timer = ROUND_SECS;
        self.left = Fighter::new(self.selection, LEFT_START_X, Facing::Right);
        self.right = Fighter::new(cpu_pick, RIGHT_START_X, Facing::Left);
        self.phase = Phase::RoundActive;

        tracing::info!(
            round_id = self.state.round_id,
            left = self.left.name(),
            right = self.right.name(),
            "Round started"
        );
        MatchEvent::RoundStarted {
            round_id: self.state.round_id,
            left_name: self.label(Side::Left),
            right_name: self.label(Side::Right),
        }
    }

    /// Decide the round. Runs at most once per round: both the tick and the
    /// countdown may observe the end condition.
    fn finish_round(&mut self) -> Vec<MatchEvent> {
        if self.phase != Phase::RoundActive {
            return Vec::new();
        }

        let outcome = match scoring::round_winner(self.left.hp, self.right.hp) {
            Some(side) => {
                match side {
                    Side::Left => self.state.left_rounds += 1,
                    Side::Right => self.state.right_rounds += 1,
                }
                RoundOutcome::Winner {
                    side,
                    name: self.fighter(side).name().to_string(),
                }
            },
            None => RoundOutcome::Draw,
        };
        let champion = scoring::champion(self.state.left_rounds, self.state.right_rounds);
        self.phase = if champion.is_some() {
            Phase::MatchOver
        } else {
            Phase::RoundEnding
        };

        tracing::info!(
            round_id = self.state.round_id,
            left_hp = self.left.hp,
            right_hp = self.right.hp,
            left_rounds = self.state.left_rounds,
            right_rounds = self.state.right_rounds,
            winner = ?outcome.winner(),
            "Round finished"
        );

        let mut events = vec![MatchEvent::RoundEnded {
            round_id: self.state.round_id,
            outcome,
            left_rounds: self.state.left_rounds,
            right_rounds: self.state.right_rounds,
            restart_in_secs: champion.is_none().then_some(RESTART_DELAY_SECS),
        }];
        if let Some(side) = champion {
            let name = self.fighter(side).name().to_string();
            tracing::info!(champion = ?side, name = %name, "Match over");
            events.push(MatchEvent::MatchOver {
                champion: side,
                name,
            });
        }
        events
    }
}

impl Default for RoundController {
    fn default() -> Self {
        Self::new()
    }
}

fn hit_event(attacker: Side, hit: Hit) -> MatchEvent {
    tracing::debug!(
        attacker = ?attacker,
        kind = ?hit.kind,
        damage = hit.damage,
        defender_hp = hit.defender_hp,
        "Hit landed"
    );
    MatchEvent::Hit {
        attacker,
        kind: hit.kind,
        damage: hit.damage,
        defender_hp: hit.defender_hp,
    }
}
