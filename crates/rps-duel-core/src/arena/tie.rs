//! Post-tie negotiation: rematch or split.

use super::{even_split, require_status, Arena};
use crate::clock::Clock;
use crate::error::GameError;
use crate::escrow::Escrow;
use crate::protocol::{
    Game, GameEvent, GameId, GameStatus, PlayerId, Side, TieChoice, TieOutcome,
};
use tracing::info;

impl<E: Escrow, C: Clock> Arena<E, C> {
    /// Record a tie choice, resolving once both sides have chosen.
    ///
    /// Past the tie deadline any call forces an even split, whatever the
    /// choice. Before it, each side may change its choice freely; matching
    /// `rematch` choices reset the game to `waiting`, any other pair splits.
    pub fn handle_tie(
        &mut self,
        caller: PlayerId,
        id: GameId,
        choice: TieChoice,
    ) -> Result<Option<TieOutcome>, GameError> {
        let game = self.registry.get(id)?;
        require_status(game, GameStatus::TieResolution)?;
        let deadline = game.tie_deadline.ok_or(GameError::Inconsistent {
            game: id,
            reason: "tie resolution without a deadline",
        })?;

        if self.clock.now() > deadline {
            let next = game.clone();
            return self.split_tie(caller, next, choice, true);
        }

        let side = game.side_of(caller).ok_or(GameError::NotParticipant(id))?;
        if choice == TieChoice::None {
            return Err(GameError::InvalidTieChoice);
        }

        let mut next = game.clone();
        next.tie_choices[side.index()] = choice;

        match (next.tie_choice(Side::First), next.tie_choice(Side::Second)) {
            (TieChoice::None, _) | (_, TieChoice::None) => {
                self.registry.replace(next)?;
                info!("Player {} chose {:?} in game {}", caller, choice, id);
                self.emit(vec![GameEvent::TieHandled {
                    game_id: id,
                    player: caller,
                    choice,
                    outcome: None,
                    payouts: Vec::new(),
                }]);
                Ok(None)
            }
            (TieChoice::Rematch, TieChoice::Rematch) => {
                next.reset_for_rematch();
                let round = next.round;
                self.registry.replace(next)?;
                info!("Game {} heads to rematch round {}", id, round);
                self.emit(vec![GameEvent::TieHandled {
                    game_id: id,
                    player: caller,
                    choice,
                    outcome: Some(TieOutcome::Rematch),
                    payouts: Vec::new(),
                }]);
                Ok(Some(TieOutcome::Rematch))
            }
            _ => self.split_tie(caller, next, choice, false),
        }
    }

    fn split_tie(
        &mut self,
        caller: PlayerId,
        mut next: Game,
        choice: TieChoice,
        forced: bool,
    ) -> Result<Option<TieOutcome>, GameError> {
        let id = next.id;
        let payouts = even_split(&next)?;
        next.status = GameStatus::Completed;
        self.commit_and_pay(next, &payouts)?;

        let outcome = TieOutcome::Split { forced };
        info!("Game {} tie settled by split (forced: {})", id, forced);
        self.emit(vec![GameEvent::TieHandled {
            game_id: id,
            player: caller,
            choice,
            outcome: Some(outcome),
            payouts,
        }]);
        Ok(Some(outcome))
    }
}
