//! Game parameters.

use chrono::Duration;

/// Deposit each side must escrow
pub const FIXED_STAKE: u64 = 1_000;
pub const REVEAL_WINDOW_SECS: i64 = 120;
pub const TIE_WINDOW_SECS: i64 = 120;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub stake: u64,
    /// Time from the second commitment until reveals close
    pub reveal_window: Duration,
    /// Time from entering tie resolution until a split is forced
    pub tie_window: Duration,
}

impl GameConfig {
    pub fn with_stake(stake: u64) -> Self {
        Self {
            stake,
            ..Self::default()
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            stake: FIXED_STAKE,
            reveal_window: Duration::seconds(REVEAL_WINDOW_SECS),
            tie_window: Duration::seconds(TIE_WINDOW_SECS),
        }
    }
}
