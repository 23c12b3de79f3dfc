//! RPS Duel Core Library
//!
//! Two-party Rock-Paper-Scissors with escrowed stakes, played through a
//! commit-reveal protocol. Every operation on [`Arena`] runs to completion as
//! one atomic step: it is either rejected before any state changes, or its
//! state transition and payout land together.

pub mod arena;
pub mod clock;
pub mod config;
pub mod crypto;
pub mod error;
pub mod escrow;
pub mod games;
pub mod protocol;
pub mod registry;

pub use arena::Arena;
pub use clock::{Clock, ClockError, ManualClock, SystemClock};
pub use config::{GameConfig, FIXED_STAKE, REVEAL_WINDOW_SECS, TIE_WINDOW_SECS};
pub use crypto::{Commitment, Nonce, Salt};
pub use error::{ErrorKind, GameError};
pub use escrow::{Escrow, InMemoryEscrow, Payout, TransferError};
pub use games::{judge, Move, Outcome};
pub use protocol::{
    EventLog, Game, GameEvent, GameId, GameStatus, PlayerId, Side, TieChoice, TieOutcome,
};
pub use registry::GameRegistry;
