//! Rock-Paper-Scissors moves and the outcome rule.

use crate::protocol::Side;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the three fixed moves
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Move {
    Rock,
    Paper,
    Scissors,
}

impl Move {
    pub const ALL: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];

    /// Single-byte encoding used inside commitments
    pub fn code(&self) -> u8 {
        match self {
            Move::Rock => 1,
            Move::Paper => 2,
            Move::Scissors => 3,
        }
    }

    /// Check if this move beats the other
    pub fn beats(&self, other: &Move) -> bool {
        matches!(
            (self, other),
            (Move::Rock, Move::Scissors) | (Move::Scissors, Move::Paper) | (Move::Paper, Move::Rock)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Move::Rock => "rock",
            Move::Paper => "paper",
            Move::Scissors => "scissors",
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Move {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rock" => Ok(Move::Rock),
            "paper" => Ok(Move::Paper),
            "scissors" => Ok(Move::Scissors),
            other => Err(format!("unknown move: {other}")),
        }
    }
}

/// Result of comparing two revealed moves
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Tie,
    FirstWins,
    SecondWins,
}

impl Outcome {
    /// The winning side, if any
    pub fn winner(&self) -> Option<Side> {
        match self {
            Outcome::Tie => None,
            Outcome::FirstWins => Some(Side::First),
            Outcome::SecondWins => Some(Side::Second),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Tie => "Tie",
            Outcome::FirstWins => "First wins",
            Outcome::SecondWins => "Second wins",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compare the first side's move against the second side's
pub fn judge(first: Move, second: Move) -> Outcome {
    if first == second {
        Outcome::Tie
    } else if first.beats(&second) {
        Outcome::FirstWins
    } else {
        Outcome::SecondWins
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rps_rock_beats_scissors() {
        assert_eq!(judge(Move::Rock, Move::Scissors), Outcome::FirstWins);
        assert_eq!(judge(Move::Scissors, Move::Rock), Outcome::SecondWins);
    }

    #[test]
    fn test_rps_scissors_beats_paper() {
        assert_eq!(judge(Move::Scissors, Move::Paper), Outcome::FirstWins);
        assert_eq!(judge(Move::Paper, Move::Scissors), Outcome::SecondWins);
    }

    #[test]
    fn test_rps_paper_beats_rock() {
        assert_eq!(judge(Move::Paper, Move::Rock), Outcome::FirstWins);
        assert_eq!(judge(Move::Rock, Move::Paper), Outcome::SecondWins);
    }

    #[test]
    fn test_rps_ties() {
        for mv in Move::ALL {
            assert_eq!(judge(mv, mv), Outcome::Tie);
        }
    }

    #[test]
    fn test_rps_swap_symmetry() {
        for a in Move::ALL {
            for b in Move::ALL {
                let forward = judge(a, b);
                let swapped = judge(b, a);
                match forward {
                    Outcome::Tie => assert_eq!(swapped, Outcome::Tie),
                    Outcome::FirstWins => assert_eq!(swapped, Outcome::SecondWins),
                    Outcome::SecondWins => assert_eq!(swapped, Outcome::FirstWins),
                }
            }
        }
    }

    #[test]
    fn test_rps_all_outcomes() {
        let mut first_wins = 0;
        let mut second_wins = 0;
        let mut ties = 0;

        for a in Move::ALL {
            for b in Move::ALL {
                match judge(a, b) {
                    Outcome::FirstWins => first_wins += 1,
                    Outcome::SecondWins => second_wins += 1,
                    Outcome::Tie => ties += 1,
                }
            }
        }

        assert_eq!(first_wins, 3);
        assert_eq!(second_wins, 3);
        assert_eq!(ties, 3);
    }

    #[test]
    fn test_outcome_winner() {
        assert_eq!(Outcome::Tie.winner(), None);
        assert_eq!(Outcome::FirstWins.winner(), Some(Side::First));
        assert_eq!(Outcome::SecondWins.winner(), Some(Side::Second));
    }

    #[test]
    fn test_move_parse() {
        assert_eq!("Rock".parse::<Move>(), Ok(Move::Rock));
        assert_eq!("scissors".parse::<Move>(), Ok(Move::Scissors));
        assert!("lizard".parse::<Move>().is_err());
    }

    #[test]
    fn test_move_codes_distinct() {
        assert_ne!(Move::Rock.code(), Move::Paper.code());
        assert_ne!(Move::Paper.code(), Move::Scissors.code());
        assert_ne!(Move::Rock.code(), Move::Scissors.code());
    }
}
