//! Settling a reveal phase that stalled past its deadline.

use super::{even_split, require_status, second_party, Arena};
use crate::clock::Clock;
use crate::error::GameError;
use crate::escrow::{Escrow, Payout};
use crate::protocol::{GameEvent, GameId, GameStatus, PlayerId, Side};
use tracing::info;

impl<E: Escrow, C: Clock> Arena<E, C> {
    /// Close a reveal phase whose deadline has passed. Anyone may call.
    ///
    /// A lone revealer takes the whole pot; if neither side revealed the
    /// stakes are returned. Returns the winner, if any.
    pub fn claim_after_reveal_timeout(
        &mut self,
        caller: PlayerId,
        id: GameId,
    ) -> Result<Option<PlayerId>, GameError> {
        let game = self.registry.get(id)?;
        require_status(game, GameStatus::Revealing)?;
        let deadline = game.reveal_deadline.ok_or(GameError::Inconsistent {
            game: id,
            reason: "revealing without a deadline",
        })?;
        if self.clock.now() <= deadline {
            return Err(GameError::RevealWindowOpen(id));
        }

        let revealed = (game.has_revealed(Side::First), game.has_revealed(Side::Second));
        let (winner, payouts) = match revealed {
            (true, false) => {
                let winner = game.first_party;
                (Some(winner), vec![Payout::new(winner, game.pot())])
            }
            (false, true) => {
                let winner = second_party(game)?;
                (Some(winner), vec![Payout::new(winner, game.pot())])
            }
            (false, false) => (None, even_split(game)?),
            (true, true) => {
                return Err(GameError::Inconsistent {
                    game: id,
                    reason: "both sides revealed but the game is unresolved",
                })
            }
        };

        let mut next = game.clone();
        next.status = GameStatus::Completed;
        let (first_move, second_move) = (
            next.revealed_move(Side::First),
            next.revealed_move(Side::Second),
        );
        self.commit_and_pay(next, &payouts)?;

        match winner {
            Some(winner) => info!(
                "Game {} timed out, {} wins by default (claimed by {})",
                id, winner, caller
            ),
            None => info!(
                "Game {} timed out with no reveals, stakes returned (claimed by {})",
                id, caller
            ),
        }
        self.emit(vec![GameEvent::GameResolved {
            game_id: id,
            winner,
            first_move,
            second_move,
            payouts,
        }]);
        Ok(winner)
    }
}
