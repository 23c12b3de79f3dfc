//! Application state management.

use crate::config::NodeConfig;
use chrono::{DateTime, Utc};
use rps_duel_core::{Arena, Clock, ClockError, InMemoryEscrow, ManualClock, PlayerId, SystemClock};
use std::sync::{Arc, Mutex, MutexGuard};

pub type NodeArena = Arena<InMemoryEscrow, Box<dyn Clock + Send>>;

/// Shared application state
///
/// Every request takes the arena lock for the whole of one operation, so
/// operations are applied strictly one after another.
#[derive(Clone)]
pub struct AppState {
    arena: Arc<Mutex<NodeArena>>,
    escrow: InMemoryEscrow,
    /// Present when running on simulated time
    sim_clock: Option<ManualClock>,
    initial_balance: u64,
}

impl AppState {
    pub fn new(config: &NodeConfig) -> Self {
        let escrow = InMemoryEscrow::new();
        let sim_clock = config.simulated_time.then(ManualClock::starting_now);
        let clock: Box<dyn Clock + Send> = match &sim_clock {
            Some(clock) => Box::new(clock.clone()),
            None => Box::new(SystemClock),
        };

        Self {
            arena: Arc::new(Mutex::new(Arena::new(config.game, escrow.clone(), clock))),
            escrow,
            sim_clock,
            initial_balance: config.initial_balance,
        }
    }

    /// Exclusive access to the arena for one operation
    pub fn arena(&self) -> MutexGuard<'_, NodeArena> {
        self.arena.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Create a funded account
    pub fn register_account(&self) -> PlayerId {
        let id = PlayerId::new();
        self.escrow.fund(id, self.initial_balance);
        id
    }

    pub fn balance(&self, id: PlayerId) -> u64 {
        self.escrow.balance(id)
    }

    /// Ledger time as seen by operations
    pub fn now(&self) -> DateTime<Utc> {
        self.arena().clock().now()
    }

    /// Advance simulated time; `None` when running on wall-clock time
    pub fn advance_time(&self, seconds: i64) -> Option<Result<DateTime<Utc>, ClockError>> {
        self.sim_clock.as_ref().map(|clock| clock.advance(seconds))
    }
}
