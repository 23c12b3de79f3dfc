//! Creating, joining, re-committing and cancelling games.

use super::{require_status, Arena};
use crate::clock::Clock;
use crate::crypto::Commitment;
use crate::error::GameError;
use crate::escrow::{Escrow, Payout};
use crate::protocol::{Game, GameEvent, GameId, GameStatus, PlayerId, Side};
use tracing::info;

impl<E: Escrow, C: Clock> Arena<E, C> {
    /// Open a new game with the creator's commitment and stake
    pub fn create(
        &mut self,
        caller: PlayerId,
        commitment: Commitment,
        stake: u64,
    ) -> Result<GameId, GameError> {
        if stake != self.config.stake {
            return Err(GameError::AmountMismatch {
                expected: self.config.stake,
                actual: stake,
            });
        }

        let id = self.registry.next_id();
        self.escrow.deposit(id, caller, stake)?;
        self.registry.insert(Game::new(id, caller, commitment, stake));

        info!("Game {} created by {} with stake {}", id, caller, stake);
        self.emit(vec![GameEvent::GameCreated {
            game_id: id,
            creator: caller,
            stake,
        }]);
        Ok(id)
    }

    /// Take the second slot of an open game and start the reveal window
    pub fn join(
        &mut self,
        caller: PlayerId,
        id: GameId,
        commitment: Commitment,
        stake: u64,
    ) -> Result<(), GameError> {
        let game = self.registry.get(id)?;
        require_status(game, GameStatus::Waiting)?;
        if game.awaiting_recommit() {
            return Err(GameError::AwaitingRecommit(id));
        }
        if caller == game.first_party {
            return Err(GameError::CannotJoinOwnGame(id));
        }
        if stake != game.stake {
            return Err(GameError::AmountMismatch {
                expected: game.stake,
                actual: stake,
            });
        }

        let reveal_deadline = self.clock.now() + self.config.reveal_window;
        let mut next = game.clone();
        next.second_party = Some(caller);
        next.commitments[Side::Second.index()] = Some(commitment);
        next.reveal_deadline = Some(reveal_deadline);
        next.status = GameStatus::Revealing;

        self.escrow.deposit(id, caller, stake)?;
        self.registry.replace(next)?;

        info!("Player {} joined game {}, reveals close at {}", caller, id, reveal_deadline);
        self.emit(vec![GameEvent::GameJoined {
            game_id: id,
            challenger: caller,
            reveal_deadline,
        }]);
        Ok(())
    }

    /// Submit a fresh commitment after a rematch.
    ///
    /// Both stakes stay escrowed across the rematch. Once both sides have
    /// re-committed the reveal window opens again.
    pub fn recommit(
        &mut self,
        caller: PlayerId,
        id: GameId,
        commitment: Commitment,
    ) -> Result<(), GameError> {
        let game = self.registry.get(id)?;
        require_status(game, GameStatus::Waiting)?;
        let side = game.side_of(caller).ok_or(GameError::NotParticipant(id))?;
        if game.commitment(side).is_some() {
            return Err(GameError::AlreadyCommitted(id));
        }

        let mut next = game.clone();
        next.commitments[side.index()] = Some(commitment);
        if next.commitments.iter().all(Option::is_some) {
            next.reveal_deadline = Some(self.clock.now() + self.config.reveal_window);
            next.status = GameStatus::Revealing;
        }
        let (round, reveal_deadline) = (next.round, next.reveal_deadline);
        self.registry.replace(next)?;

        info!("Player {} re-committed for round {} of game {}", caller, round, id);
        self.emit(vec![GameEvent::GameRecommitted {
            game_id: id,
            player: caller,
            round,
            reveal_deadline,
        }]);
        Ok(())
    }

    /// Withdraw a game nobody has joined, or abandon a pending rematch.
    ///
    /// Before a join only the creator may cancel and gets their stake back.
    /// While a rematch awaits commitments either participant may cancel and
    /// both stakes are returned.
    pub fn cancel(&mut self, caller: PlayerId, id: GameId) -> Result<Vec<Payout>, GameError> {
        let game = self.registry.get(id)?;
        require_status(game, GameStatus::Waiting)?;
        let refunds = match game.second_party {
            None => {
                if caller != game.first_party {
                    return Err(GameError::NotCreator(id));
                }
                vec![Payout::new(game.first_party, game.stake)]
            }
            Some(_) => {
                if game.side_of(caller).is_none() {
                    return Err(GameError::NotParticipant(id));
                }
                super::even_split(game)?
            }
        };

        let mut next = game.clone();
        next.status = GameStatus::Cancelled;
        self.commit_and_pay(next, &refunds)?;

        info!("Game {} cancelled by {}", id, caller);
        self.emit(vec![GameEvent::GameCancelled {
            game_id: id,
            refunds: refunds.clone(),
        }]);
        Ok(refunds)
    }
}
