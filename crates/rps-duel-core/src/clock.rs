//! Ledger time source.
//!
//! Deadlines are evaluated lazily: every operation reads `now()` once when it
//! runs and compares against stored deadlines. Nothing fires on expiry.

use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// Wall-clock time
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ClockError {
    #[error("Simulated time cannot move backwards ({0}s)")]
    Backwards(i64),

    #[error("Advancing simulated time by {0}s is out of range")]
    OutOfRange(i64),
}

/// Simulated time that only moves when told to; clones share one instant
#[derive(Clone, Debug)]
pub struct ManualClock {
    current: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            current: Arc::new(Mutex::new(start)),
        }
    }

    /// Start from the current wall-clock time
    pub fn starting_now() -> Self {
        Self::new(Utc::now())
    }

    /// Advance simulated time by seconds, returning the new instant.
    ///
    /// Time never moves backwards; a rejected step leaves the clock as it was.
    pub fn advance(&self, seconds: i64) -> Result<DateTime<Utc>, ClockError> {
        if seconds < 0 {
            return Err(ClockError::Backwards(seconds));
        }
        let step = Duration::try_seconds(seconds).ok_or(ClockError::OutOfRange(seconds))?;
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current = current
            .checked_add_signed(step)
            .ok_or(ClockError::OutOfRange(seconds))?;
        Ok(*current)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}
