//! Escrow ledger abstraction: the only place funds move.

mod memory;
mod traits;

pub use memory::InMemoryEscrow;
pub use traits::{Escrow, Payout, TransferError};
