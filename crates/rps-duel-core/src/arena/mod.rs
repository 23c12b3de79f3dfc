//! The duel state machine.
//!
//! [`Arena`] owns the registry, the escrow handle, the clock and the event
//! journal. Each public operation loads a record, stages every change on a
//! copy, and commits in one step:
//!
//! 1. all checks run first; any rejection leaves nothing behind,
//! 2. deposits are taken before the staged record is written,
//! 3. payouts happen after the record is written; a failed payout restores
//!    the previous record and the whole operation is rejected,
//! 4. events are journaled only once the operation has fully succeeded.

mod lifecycle;
mod reveal;
mod tie;
mod timeout;

use crate::clock::{Clock, SystemClock};
use crate::config::GameConfig;
use crate::error::GameError;
use crate::escrow::{Escrow, Payout};
use crate::protocol::{EventLog, Game, GameEvent, GameId, GameStatus, PlayerId};
use crate::registry::GameRegistry;
use tracing::{debug, warn};

pub struct Arena<E, C = SystemClock> {
    config: GameConfig,
    registry: GameRegistry,
    escrow: E,
    clock: C,
    events: EventLog,
}

impl<E: Escrow, C: Clock> Arena<E, C> {
    pub fn new(config: GameConfig, escrow: E, clock: C) -> Self {
        Self {
            config,
            registry: GameRegistry::new(),
            escrow,
            clock,
            events: EventLog::new(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn registry(&self) -> &GameRegistry {
        &self.registry
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Current snapshot of a game
    pub fn get_game(&self, id: GameId) -> Result<&Game, GameError> {
        self.registry.get(id)
    }

    pub fn open_games(&self) -> Vec<&Game> {
        self.registry.open_games()
    }

    pub fn games_for(&self, player: PlayerId) -> Vec<&Game> {
        self.registry.games_for(player)
    }

    /// Write `next` over its record, then pay out.
    ///
    /// The record is committed before funds move, so nothing reachable from a
    /// recipient can observe pre-transfer state. If the payout fails the
    /// previous record is put back.
    fn commit_and_pay(&mut self, next: Game, payouts: &[Payout]) -> Result<(), GameError> {
        let id = next.id;
        let previous = self.registry.replace(next)?;
        if payouts.is_empty() {
            return Ok(());
        }
        if let Err(err) = self.escrow.release(id, payouts) {
            warn!("Payout for game {} failed, rolling back: {}", id, err);
            self.registry.replace(previous)?;
            return Err(err.into());
        }
        Ok(())
    }

    fn emit(&mut self, events: Vec<GameEvent>) {
        for event in &events {
            debug!(?event, "emitting");
        }
        self.events.extend(events);
    }
}

fn require_status(game: &Game, expected: GameStatus) -> Result<(), GameError> {
    if game.status != expected {
        return Err(GameError::WrongPhase {
            game: game.id,
            expected,
            actual: game.status,
        });
    }
    Ok(())
}

fn second_party(game: &Game) -> Result<PlayerId, GameError> {
    game.second_party.ok_or(GameError::Inconsistent {
        game: game.id,
        reason: "second party missing after join",
    })
}

/// One stake back to each side
fn even_split(game: &Game) -> Result<Vec<Payout>, GameError> {
    Ok(vec![
        Payout::new(game.first_party, game.stake),
        Payout::new(second_party(game)?, game.stake),
    ])
}
