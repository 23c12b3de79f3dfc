//! In-memory escrow ledger.

use super::traits::{Escrow, Payout, TransferError};
use crate::protocol::{GameId, PlayerId};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Book {
    balances: HashMap<PlayerId, u64>,
    held: HashMap<GameId, u64>,
    deposited: HashMap<GameId, u64>,
    paid_out: HashMap<GameId, u64>,
    /// Accounts that refuse incoming payouts
    rejecting: HashSet<PlayerId>,
}

/// In-memory escrow, cheap to clone; clones share one book
#[derive(Clone, Debug, Default)]
pub struct InMemoryEscrow {
    book: Arc<Mutex<Book>>,
}

impl InMemoryEscrow {
    pub fn new() -> Self {
        Self::default()
    }

    fn book(&self) -> MutexGuard<'_, Book> {
        // The book is only mutated after every check has passed, so a
        // poisoned lock still guards consistent data.
        self.book.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Credit an account from outside the game system
    pub fn fund(&self, player: PlayerId, amount: u64) {
        let mut book = self.book();
        let balance = book.balances.entry(player).or_default();
        *balance = balance.saturating_add(amount);
    }

    /// Get current balance
    pub fn balance(&self, player: PlayerId) -> u64 {
        self.book().balances.get(&player).copied().unwrap_or(0)
    }

    /// Funds currently held for a game
    pub fn held(&self, game: GameId) -> u64 {
        self.book().held.get(&game).copied().unwrap_or(0)
    }

    /// Total ever deposited into a game
    pub fn deposited(&self, game: GameId) -> u64 {
        self.book().deposited.get(&game).copied().unwrap_or(0)
    }

    /// Total ever paid out of a game
    pub fn paid_out(&self, game: GameId) -> u64 {
        self.book().paid_out.get(&game).copied().unwrap_or(0)
    }

    /// Make every future payout to `player` fail
    pub fn reject_payouts_to(&self, player: PlayerId) {
        self.book().rejecting.insert(player);
    }

    pub fn accept_payouts_to(&self, player: PlayerId) {
        self.book().rejecting.remove(&player);
    }
}

impl Escrow for InMemoryEscrow {
    fn deposit(&self, game: GameId, from: PlayerId, amount: u64) -> Result<(), TransferError> {
        let mut book = self.book();

        let available = book.balances.get(&from).copied().unwrap_or(0);
        if available < amount {
            return Err(TransferError::InsufficientFunds {
                player: from,
                needed: amount,
                available,
            });
        }
        let held = book.held.get(&game).copied().unwrap_or(0);
        let new_held = held.checked_add(amount).ok_or(TransferError::Overflow)?;
        let new_deposited = book
            .deposited
            .get(&game)
            .copied()
            .unwrap_or(0)
            .checked_add(amount)
            .ok_or(TransferError::Overflow)?;

        book.balances.insert(from, available - amount);
        book.held.insert(game, new_held);
        book.deposited.insert(game, new_deposited);
        Ok(())
    }

    fn release(&self, game: GameId, payouts: &[Payout]) -> Result<(), TransferError> {
        let mut book = self.book();

        let total = payouts
            .iter()
            .try_fold(0u64, |acc, p| acc.checked_add(p.amount))
            .ok_or(TransferError::Overflow)?;
        let held = book.held.get(&game).copied().unwrap_or(0);
        if held < total {
            return Err(TransferError::InsufficientEscrow {
                game,
                needed: total,
                held,
            });
        }
        if let Some(p) = payouts.iter().find(|p| book.rejecting.contains(&p.to)) {
            return Err(TransferError::Rejected(p.to));
        }
        for p in payouts {
            let balance = book.balances.get(&p.to).copied().unwrap_or(0);
            if balance.checked_add(p.amount).is_none() {
                return Err(TransferError::Overflow);
            }
        }

        // Every check passed; apply all credits.
        for p in payouts {
            *book.balances.entry(p.to).or_default() += p.amount;
        }
        book.held.insert(game, held - total);
        *book.paid_out.entry(game).or_default() += total;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deposit_moves_funds_into_game() {
        let escrow = InMemoryEscrow::new();
        let alice = PlayerId::new();
        escrow.fund(alice, 10_000);

        escrow.deposit(GameId(1), alice, 1_000).unwrap();

        assert_eq!(escrow.balance(alice), 9_000);
        assert_eq!(escrow.held(GameId(1)), 1_000);
        assert_eq!(escrow.deposited(GameId(1)), 1_000);
    }

    #[test]
    fn test_insufficient_funds() {
        let escrow = InMemoryEscrow::new();
        let alice = PlayerId::new();
        escrow.fund(alice, 500);

        let result = escrow.deposit(GameId(1), alice, 1_000);
        assert!(matches!(
            result,
            Err(TransferError::InsufficientFunds { available: 500, .. })
        ));
        assert_eq!(escrow.balance(alice), 500);
        assert_eq!(escrow.held(GameId(1)), 0);
    }

    #[test]
    fn test_release_split() {
        let escrow = InMemoryEscrow::new();
        let alice = PlayerId::new();
        let bob = PlayerId::new();
        escrow.fund(alice, 1_000);
        escrow.fund(bob, 1_000);
        escrow.deposit(GameId(1), alice, 1_000).unwrap();
        escrow.deposit(GameId(1), bob, 1_000).unwrap();

        escrow
            .release(GameId(1), &[Payout::new(alice, 1_000), Payout::new(bob, 1_000)])
            .unwrap();

        assert_eq!(escrow.balance(alice), 1_000);
        assert_eq!(escrow.balance(bob), 1_000);
        assert_eq!(escrow.held(GameId(1)), 0);
        assert_eq!(escrow.paid_out(GameId(1)), 2_000);
    }

    #[test]
    fn test_release_more_than_held_fails() {
        let escrow = InMemoryEscrow::new();
        let alice = PlayerId::new();
        escrow.fund(alice, 1_000);
        escrow.deposit(GameId(1), alice, 1_000).unwrap();

        let result = escrow.release(GameId(1), &[Payout::new(alice, 2_000)]);
        assert!(matches!(
            result,
            Err(TransferError::InsufficientEscrow { held: 1_000, .. })
        ));
        assert_eq!(escrow.held(GameId(1)), 1_000);
    }

    #[test]
    fn test_rejected_recipient_blocks_whole_release() {
        let escrow = InMemoryEscrow::new();
        let alice = PlayerId::new();
        let bob = PlayerId::new();
        escrow.fund(alice, 1_000);
        escrow.fund(bob, 1_000);
        escrow.deposit(GameId(1), alice, 1_000).unwrap();
        escrow.deposit(GameId(1), bob, 1_000).unwrap();
        escrow.reject_payouts_to(bob);

        let result =
            escrow.release(GameId(1), &[Payout::new(alice, 1_000), Payout::new(bob, 1_000)]);

        assert_eq!(result, Err(TransferError::Rejected(bob)));
        assert_eq!(escrow.balance(alice), 0);
        assert_eq!(escrow.held(GameId(1)), 2_000);

        escrow.accept_payouts_to(bob);
        escrow
            .release(GameId(1), &[Payout::new(alice, 1_000), Payout::new(bob, 1_000)])
            .unwrap();
        assert_eq!(escrow.balance(bob), 1_000);
    }

    #[test]
    fn test_clones_share_book() {
        let escrow = InMemoryEscrow::new();
        let handle = escrow.clone();
        let alice = PlayerId::new();

        escrow.fund(alice, 250);
        assert_eq!(handle.balance(alice), 250);
    }
}
