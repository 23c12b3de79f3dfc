//! Arena of game records keyed by sequential id.

use crate::error::GameError;
use crate::protocol::{Game, GameId, PlayerId};

/// Owns every game record. Ids start at 1 and are never reused.
#[derive(Clone, Debug, Default)]
pub struct GameRegistry {
    games: Vec<Game>,
}

impl GameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifier the next inserted game will receive
    pub fn next_id(&self) -> GameId {
        self.games.last().map_or(GameId::FIRST, |g| g.id.next())
    }

    pub(crate) fn insert(&mut self, game: Game) -> GameId {
        debug_assert_eq!(game.id, self.next_id());
        let id = game.id;
        self.games.push(game);
        id
    }

    fn slot(id: GameId) -> Option<usize> {
        usize::try_from(id.0).ok()?.checked_sub(1)
    }

    pub fn get(&self, id: GameId) -> Result<&Game, GameError> {
        Self::slot(id)
            .and_then(|i| self.games.get(i))
            .ok_or(GameError::GameNotFound(id))
    }

    pub(crate) fn get_mut(&mut self, id: GameId) -> Result<&mut Game, GameError> {
        Self::slot(id)
            .and_then(|i| self.games.get_mut(i))
            .ok_or(GameError::GameNotFound(id))
    }

    /// Swap in a new record, returning the one it replaced
    pub(crate) fn replace(&mut self, game: Game) -> Result<Game, GameError> {
        let slot = self.get_mut(game.id)?;
        Ok(std::mem::replace(slot, game))
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Games accepting a first opponent
    pub fn open_games(&self) -> Vec<&Game> {
        self.games.iter().filter(|g| g.is_open()).collect()
    }

    pub fn games_for(&self, player: PlayerId) -> Vec<&Game> {
        self.games
            .iter()
            .filter(|g| g.side_of(player).is_some())
            .collect()
    }
}
