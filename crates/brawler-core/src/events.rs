use std::fmt;

use serde::{Deserialize, Serialize};

use crate::commands::AttackKind;
use crate::view::Side;

/// How a round was decided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    Winner { side: Side, name: String },
    Draw,
}

impl RoundOutcome {
    pub fn winner(&self) -> Option<Side> {
        match self {
            RoundOutcome::Winner { side, .. } => Some(*side),
            RoundOutcome::Draw => None,
        }
    }
}

/// Events emitted by the round controller for presentation layers and logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MatchEvent {
    RoundStarted {
        round_id: u64,
        left_name: String,
        right_name: String,
    },
    Hit {
        attacker: Side,
        kind: AttackKind,
        damage: i32,
        defender_hp: i32,
    },
    RoundEnded {
        round_id: u64,
        outcome: RoundOutcome,
        left_rounds: u32,
        right_rounds: u32,
        /// Seconds until the next round starts; `None` when the match is over.
        restart_in_secs: Option<u64>,
    },
    MatchOver {
        champion: Side,
        name: String,
    },
}

impl fmt::Display for MatchEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RoundStarted {
                left_name,
                right_name,
                ..
            } => write!(f, "{left_name} vs {right_name}. Fight!"),
            Self::Hit {
                attacker,
                kind,
                damage,
                ..
            } => write!(f, "{attacker:?} lands a {kind:?} for {damage}"),
            Self::RoundEnded {
                outcome,
                restart_in_secs,
                ..
            } => {
                match outcome {
                    RoundOutcome::Winner { name, .. } => write!(f, "{name} wins round!")?,
                    RoundOutcome::Draw => write!(f, "Round draw!")?,
                }
                if let Some(secs) = restart_in_secs {
                    write!(f, " Next round starts in {secs} seconds...")?;
                }
                Ok(())
            },
            Self::MatchOver { name, .. } => write!(f, "{name} wins the match!"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_announcements() {
        let ev = MatchEvent::RoundEnded {
            round_id: 1,
            outcome: RoundOutcome::Winner {
                side: Side::Left,
                name: "Elmo".to_string(),
            },
            left_rounds: 1,
            right_rounds: 0,
            restart_in_secs: Some(2),
        };
        assert_eq!(
            ev.to_string(),
            "Elmo wins round! Next round starts in 2 seconds..."
        );

        let draw = MatchEvent::RoundEnded {
            round_id: 2,
            outcome: RoundOutcome::Draw,
            left_rounds: 1,
            right_rounds: 1,
            restart_in_secs: None,
        };
        assert_eq!(draw.to_string(), "Round draw!");
    }

    #[test]
    fn match_over_announcement() {
        let ev = MatchEvent::MatchOver {
            champion: Side::Right,
            name: "Oscar".to_string(),
        };
        assert_eq!(ev.to_string(), "Oscar wins the match!");
    }

    #[test]
    fn outcome_winner_side() {
        assert_eq!(RoundOutcome::Draw.winner(), None);
        let o = RoundOutcome::Winner {
            side: Side::Right,
            name: "Bert".to_string(),
        };
        assert_eq!(o.winner(), Some(Side::Right));
    }
}
