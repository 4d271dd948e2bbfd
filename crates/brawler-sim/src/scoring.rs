use brawler_core::view::Side;

/// Round wins needed to take the match.
pub const WIN_ROUNDS: u32 = 2;

/// A round is over once either fighter is knocked out or the clock runs out.
pub fn round_over(left_hp: i32, right_hp: i32, round_timer: u32) -> bool {
    left_hp <= 0 || right_hp <= 0 || round_timer == 0
}

/// Round winner by strictly higher remaining hp; equal hp is a draw.
pub fn round_winner(left_hp: i32, right_hp: i32) -> Option<Side> {
    if left_hp > right_hp {
        Some(Side::Left)
    } else if right_hp > left_hp {
        Some(Side::Right)
    } else {
        None
    }
}

/// Match champion once either side has reached [`WIN_ROUNDS`].
pub fn champion(left_rounds: u32, right_rounds: u32) -> Option<Side> {
    if left_rounds < WIN_ROUNDS && right_rounds < WIN_ROUNDS {
        return None;
    }
    if left_rounds > right_rounds {
        Some(Side::Left)
    } else {
        Some(Side::Right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knockout_or_timeout_ends_round() {
        assert!(round_over(0, 50, 30));
        assert!(round_over(50, -4, 30));
        assert!(round_over(50, 50, 0));
        assert!(!round_over(1, 1, 1));
    }

    #[test]
    fn higher_hp_wins() {
        assert_eq!(round_winner(60, 20), Some(Side::Left));
        assert_eq!(round_winner(-3, 5), Some(Side::Right));
    }

    #[test]
    fn equal_hp_is_draw() {
        assert_eq!(round_winner(40, 40), None);
        assert_eq!(round_winner(0, 0), None);
    }

    #[test]
    fn champion_needs_threshold() {
        assert_eq!(champion(1, 1), None);
        assert_eq!(champion(2, 1), Some(Side::Left));
        assert_eq!(champion(0, 2), Some(Side::Right));
    }
}
