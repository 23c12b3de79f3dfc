//! Rejections reported by arena operations.

use crate::escrow::TransferError;
use crate::protocol::{GameId, GameStatus};
use serde::Serialize;
use thiserror::Error;

/// Rejection category
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed input; retry with corrected values
    Validation,
    /// Caller is not entitled to the action
    Authorization,
    /// Operation invalid in the game's current status
    Phase,
    /// Deadline has or has not yet passed
    Timing,
    CommitmentMismatch,
    Transfer,
    NotFound,
    /// State the protocol should never reach
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Stake mismatch: expected {expected}, got {actual}")]
    AmountMismatch { expected: u64, actual: u64 },

    #[error("Tie choice must be rematch or split")]
    InvalidTieChoice,

    #[error("Game not found: {0}")]
    GameNotFound(GameId),

    #[error("Caller is not a participant in game {0}")]
    NotParticipant(GameId),

    #[error("Only the creator may cancel game {0}")]
    NotCreator(GameId),

    #[error("Creator cannot join their own game {0}")]
    CannotJoinOwnGame(GameId),

    #[error("Game {game} is {actual}, expected {expected}")]
    WrongPhase {
        game: GameId,
        expected: GameStatus,
        actual: GameStatus,
    },

    #[error("Game {0} is waiting for rematch commitments, not a new opponent")]
    AwaitingRecommit(GameId),

    #[error("Already committed for this round of game {0}")]
    AlreadyCommitted(GameId),

    #[error("Already revealed for this round of game {0}")]
    AlreadyRevealed(GameId),

    #[error("Reveal window for game {0} has closed")]
    RevealWindowClosed(GameId),

    #[error("Reveal window for game {0} is still open")]
    RevealWindowOpen(GameId),

    #[error("Reveal does not match commitment")]
    CommitmentMismatch,

    #[error("Transfer failed: {0}")]
    Transfer(#[from] TransferError),

    #[error("Inconsistent state in game {game}: {reason}")]
    Inconsistent { game: GameId, reason: &'static str },
}

impl GameError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::AmountMismatch { .. } | GameError::InvalidTieChoice => ErrorKind::Validation,
            GameError::NotParticipant(_)
            | GameError::NotCreator(_)
            | GameError::CannotJoinOwnGame(_) => ErrorKind::Authorization,
            GameError::WrongPhase { .. }
            | GameError::AwaitingRecommit(_)
            | GameError::AlreadyCommitted(_)
            | GameError::AlreadyRevealed(_) => ErrorKind::Phase,
            GameError::RevealWindowClosed(_) | GameError::RevealWindowOpen(_) => ErrorKind::Timing,
            GameError::CommitmentMismatch => ErrorKind::CommitmentMismatch,
            GameError::Transfer(_) => ErrorKind::Transfer,
            GameError::GameNotFound(_) => ErrorKind::NotFound,
            GameError::Inconsistent { .. } => ErrorKind::Internal,
        }
    }
}
