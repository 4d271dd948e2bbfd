pub mod attack;
pub mod fighter;
pub mod input;
pub mod opponent;
pub mod round;
pub mod scoring;

pub use fighter::{Fighter, Intent};
pub use round::{RoundController, RoundState};

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use brawler_core::commands::CommandFlags;
    use brawler_core::events::MatchEvent;
    use brawler_core::view::Phase;
    use rand::{Rng, RngCore};

    use crate::attack::COMBO_MAX;
    use crate::fighter::{ARENA_WIDTH, FLOOR_Y, Fighter, MAX_HP, WALL_MARGIN};
    use crate::round::{ROUND_SECS, RoundController};

    /// Deterministic RNG that replays a fixed list of unit-interval draws.
    ///
    /// Each `rng.random::<f64>()` yields the next value (cycling), which
    /// makes probability gates in the CPU policy scriptable.
    #[derive(Debug, Clone)]
    pub struct ScriptedRng {
        words: Vec<u64>,
        next: usize,
    }

    impl ScriptedRng {
        pub fn new(draws: &[f64]) -> Self {
            assert!(!draws.is_empty(), "ScriptedRng needs at least one draw");
            let words = draws
                .iter()
                .map(|&v| {
                    assert!((0.0..1.0).contains(&v), "draw {v} outside [0, 1)");
                    // f64 sampling keeps the top 53 bits of a u64.
                    ((v * (1u64 << 53) as f64) as u64) << 11
                })
                .collect();
            Self { words, next: 0 }
        }
    }

    impl RngCore for ScriptedRng {
        fn next_u32(&mut self) -> u32 {
            (self.next_u64() >> 32) as u32
        }

        fn next_u64(&mut self) -> u64 {
            let word = self.words[self.next % self.words.len()];
            self.next += 1;
            word
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            for chunk in dst.chunks_mut(8) {
                let bytes = self.next_u64().to_le_bytes();
                chunk.copy_from_slice(&bytes[..chunk.len()]);
            }
        }
    }

    /// Run `n` ticks with the same held flags, returning all events.
    pub fn run_ticks<R: Rng + ?Sized>(
        ctl: &mut RoundController,
        n: usize,
        flags: &CommandFlags,
        rng: &mut R,
    ) -> Vec<MatchEvent> {
        let mut events = Vec::new();
        for _ in 0..n {
            events.extend(ctl.tick(flags, rng));
        }
        events
    }

    /// Deliver countdown seconds for the current round until it ends.
    pub fn expire_round_clock(ctl: &mut RoundController) -> Vec<MatchEvent> {
        let round_id = ctl.state().round_id;
        let mut events = Vec::new();
        for _ in 0..ROUND_SECS {
            events.extend(ctl.second_elapsed(round_id));
            if ctl.phase() != Phase::RoundActive {
                break;
            }
        }
        events
    }

    /// Positional and combat invariants that hold after every tick.
    pub fn assert_fighter_invariants(f: &Fighter) {
        assert!(f.hp <= MAX_HP, "{}: hp {} above max", f.name(), f.hp);
        assert!(f.x >= WALL_MARGIN, "{}: x {} past left wall", f.name(), f.x);
        assert!(
            f.x + f.width() <= ARENA_WIDTH - WALL_MARGIN + 1e-3,
            "{}: x {} past right wall",
            f.name(),
            f.x
        );
        assert!(
            f.y + f.height() <= FLOOR_Y + 1e-3,
            "{}: sunk below floor",
            f.name()
        );
        assert!(
            (1.0..=COMBO_MAX).contains(&f.combo_mult),
            "{}: combo {} out of range",
            f.name(),
            f.combo_mult
        );
    }
}
