//! The per-identifier game record.

use super::types::{GameId, GameStatus, PlayerId, Side, TieChoice};
use crate::crypto::Commitment;
use crate::games::Move;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authoritative state of one duel
///
/// Slot 0 always holds the creator. Slot 1 is filled by `join` and kept
/// across rematches.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub first_party: PlayerId,
    pub second_party: Option<PlayerId>,
    /// Deposit required from each side
    pub stake: u64,
    pub commitments: [Option<Commitment>; 2],
    pub revealed_moves: [Option<Move>; 2],
    /// Unset until the second side joins
    pub reveal_deadline: Option<DateTime<Utc>>,
    /// Set only while negotiating a tie
    pub tie_deadline: Option<DateTime<Utc>>,
    pub tie_choices: [TieChoice; 2],
    pub status: GameStatus,
    /// Reveal cycle, bumped on every rematch
    pub round: u32,
}

impl Game {
    pub(crate) fn new(id: GameId, creator: PlayerId, commitment: Commitment, stake: u64) -> Self {
        Self {
            id,
            first_party: creator,
            second_party: None,
            stake,
            commitments: [Some(commitment), None],
            revealed_moves: [None, None],
            reveal_deadline: None,
            tie_deadline: None,
            tie_choices: [TieChoice::None; 2],
            status: GameStatus::Waiting,
            round: 1,
        }
    }

    /// Which slot, if any, the player occupies
    pub fn side_of(&self, player: PlayerId) -> Option<Side> {
        if self.first_party == player {
            Some(Side::First)
        } else if self.second_party == Some(player) {
            Some(Side::Second)
        } else {
            None
        }
    }

    pub fn party(&self, side: Side) -> Option<PlayerId> {
        match side {
            Side::First => Some(self.first_party),
            Side::Second => self.second_party,
        }
    }

    pub fn commitment(&self, side: Side) -> Option<Commitment> {
        self.commitments[side.index()]
    }

    pub fn has_revealed(&self, side: Side) -> bool {
        self.revealed_moves[side.index()].is_some()
    }

    pub fn revealed_move(&self, side: Side) -> Option<Move> {
        self.revealed_moves[side.index()]
    }

    pub fn tie_choice(&self, side: Side) -> TieChoice {
        self.tie_choices[side.index()]
    }

    /// Open for a first join (not a rematch awaiting fresh commitments)
    pub fn is_open(&self) -> bool {
        self.status == GameStatus::Waiting && self.second_party.is_none()
    }

    /// Back in `waiting` after both sides chose a rematch
    pub fn awaiting_recommit(&self) -> bool {
        self.status == GameStatus::Waiting && self.second_party.is_some()
    }

    /// Total held in escrow for this game while it is live
    pub fn pot(&self) -> u64 {
        match self.second_party {
            Some(_) => self.stake * 2,
            None => self.stake,
        }
    }

    /// Clear every per-cycle field ahead of a rematch
    pub(crate) fn reset_for_rematch(&mut self) {
        self.commitments = [None, None];
        self.revealed_moves = [None, None];
        self.reveal_deadline = None;
        self.tie_deadline = None;
        self.tie_choices = [TieChoice::None; 2];
        self.status = GameStatus::Waiting;
        self.round += 1;
    }
}
