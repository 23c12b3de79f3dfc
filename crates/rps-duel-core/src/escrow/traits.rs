//! Escrow trait definition.

use crate::protocol::{GameId, PlayerId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from escrow transfers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("Insufficient funds: {player} has {available}, needs {needed}")]
    InsufficientFunds {
        player: PlayerId,
        needed: u64,
        available: u64,
    },

    #[error("Escrow for game {game} holds {held}, cannot release {needed}")]
    InsufficientEscrow { game: GameId, needed: u64, held: u64 },

    #[error("Recipient {0} rejected the payout")]
    Rejected(PlayerId),

    #[error("Amount overflow")]
    Overflow,
}

/// A single credit to one recipient
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub to: PlayerId,
    pub amount: u64,
}

impl Payout {
    pub fn new(to: PlayerId, amount: u64) -> Self {
        Self { to, amount }
    }
}

/// Trait for the ledger holding game stakes
///
/// Implementations can be:
/// - InMemoryEscrow for tests and the demo node
/// - A real settlement backend
pub trait Escrow {
    /// Move `amount` from `from` into the funds held for `game`
    fn deposit(&self, game: GameId, from: PlayerId, amount: u64) -> Result<(), TransferError>;

    /// Pay every recipient out of the funds held for `game`.
    ///
    /// Either all payouts land or none do.
    fn release(&self, game: GameId, payouts: &[Payout]) -> Result<(), TransferError>;
}
