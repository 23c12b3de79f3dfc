//! Reveal verification and resolution.

use super::{require_status, Arena};
use crate::clock::Clock;
use crate::crypto::{Nonce, Salt};
use crate::error::GameError;
use crate::escrow::{Escrow, Payout};
use crate::games::{judge, Move, Outcome};
use crate::protocol::{GameEvent, GameId, GameStatus, PlayerId, Side};
use tracing::info;

impl<E: Escrow, C: Clock> Arena<E, C> {
    /// Open the caller's commitment.
    ///
    /// Returns the outcome once both sides have revealed. A win pays the
    /// whole pot to the winner; a tie moves the game into tie resolution.
    pub fn reveal(
        &mut self,
        caller: PlayerId,
        id: GameId,
        mv: Move,
        salt: &Salt,
        nonce: Nonce,
    ) -> Result<Option<Outcome>, GameError> {
        let game = self.registry.get(id)?;
        require_status(game, GameStatus::Revealing)?;
        let now = self.clock.now();
        let deadline = game.reveal_deadline.ok_or(GameError::Inconsistent {
            game: id,
            reason: "revealing without a deadline",
        })?;
        if now > deadline {
            return Err(GameError::RevealWindowClosed(id));
        }
        let side = game.side_of(caller).ok_or(GameError::NotParticipant(id))?;
        if game.has_revealed(side) {
            return Err(GameError::AlreadyRevealed(id));
        }
        let commitment = game.commitment(side).ok_or(GameError::Inconsistent {
            game: id,
            reason: "revealing without a commitment",
        })?;
        if !commitment.verify(mv, salt, nonce) {
            return Err(GameError::CommitmentMismatch);
        }

        let mut next = game.clone();
        next.revealed_moves[side.index()] = Some(mv);
        let mut events = vec![GameEvent::GameRevealed {
            game_id: id,
            player: caller,
            first_revealed: next.has_revealed(Side::First),
            second_revealed: next.has_revealed(Side::Second),
        }];
        info!("Player {} revealed in game {}", caller, id);

        let (Some(first_move), Some(second_move)) =
            (next.revealed_move(Side::First), next.revealed_move(Side::Second))
        else {
            self.registry.replace(next)?;
            self.emit(events);
            return Ok(None);
        };

        let outcome = judge(first_move, second_move);
        match outcome.winner() {
            None => {
                next.status = GameStatus::TieResolution;
                next.tie_deadline = Some(now + self.config.tie_window);
                self.registry.replace(next)?;
                events.push(GameEvent::GameResolved {
                    game_id: id,
                    winner: None,
                    first_move: Some(first_move),
                    second_move: Some(second_move),
                    payouts: Vec::new(),
                });
            }
            Some(winning_side) => {
                let winner = next.party(winning_side).ok_or(GameError::Inconsistent {
                    game: id,
                    reason: "winning side has no participant",
                })?;
                let payouts = vec![Payout::new(winner, next.pot())];
                next.status = GameStatus::Completed;
                self.commit_and_pay(next, &payouts)?;
                events.push(GameEvent::GameResolved {
                    game_id: id,
                    winner: Some(winner),
                    first_move: Some(first_move),
                    second_move: Some(second_move),
                    payouts,
                });
            }
        }

        info!("Game {} resolved: {} ({} vs {})", id, outcome, first_move, second_move);
        self.emit(events);
        Ok(Some(outcome))
    }
}
