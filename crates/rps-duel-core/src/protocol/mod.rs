//! Protocol types, the game record and emitted notifications.

mod events;
mod game;
mod types;

pub use events::{EventLog, GameEvent};
pub use game::Game;
pub use types::{GameId, GameStatus, PlayerId, Side, TieChoice, TieOutcome};
