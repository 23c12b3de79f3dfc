//! Notifications emitted to external observers.

use super::types::{GameId, PlayerId, TieChoice, TieOutcome};
use crate::escrow::Payout;
use crate::games::Move;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A state change observers may react to
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    GameCreated {
        game_id: GameId,
        creator: PlayerId,
        stake: u64,
    },
    GameJoined {
        game_id: GameId,
        challenger: PlayerId,
        reveal_deadline: DateTime<Utc>,
    },
    /// A participant re-committed after a rematch
    GameRecommitted {
        game_id: GameId,
        player: PlayerId,
        round: u32,
        /// Set once both sides have re-committed
        reveal_deadline: Option<DateTime<Utc>>,
    },
    GameRevealed {
        game_id: GameId,
        player: PlayerId,
        first_revealed: bool,
        second_revealed: bool,
    },
    /// Winner is `None` on a tie or an even split
    GameResolved {
        game_id: GameId,
        winner: Option<PlayerId>,
        first_move: Option<Move>,
        second_move: Option<Move>,
        payouts: Vec<Payout>,
    },
    TieHandled {
        game_id: GameId,
        player: PlayerId,
        choice: TieChoice,
        outcome: Option<TieOutcome>,
        payouts: Vec<Payout>,
    },
    GameCancelled {
        game_id: GameId,
        refunds: Vec<Payout>,
    },
}

impl GameEvent {
    pub fn game_id(&self) -> GameId {
        match self {
            GameEvent::GameCreated { game_id, .. }
            | GameEvent::GameJoined { game_id, .. }
            | GameEvent::GameRecommitted { game_id, .. }
            | GameEvent::GameRevealed { game_id, .. }
            | GameEvent::GameResolved { game_id, .. }
            | GameEvent::TieHandled { game_id, .. }
            | GameEvent::GameCancelled { game_id, .. } => *game_id,
        }
    }
}

/// Append-only journal of emitted events, read by cursor
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Vec<GameEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn extend(&mut self, events: impl IntoIterator<Item = GameEvent>) {
        self.events.extend(events);
    }

    /// Events recorded after the first `cursor` entries
    pub fn since(&self, cursor: usize) -> &[GameEvent] {
        self.events.get(cursor..).unwrap_or(&[])
    }

    pub fn all(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
