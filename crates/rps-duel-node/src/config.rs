//! Node configuration from environment variables.

use chrono::Duration;
use rps_duel_core::{GameConfig, FIXED_STAKE, REVEAL_WINDOW_SECS, TIE_WINDOW_SECS};
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_INITIAL_BALANCE: u64 = 10_000;
/// Upper bound for the reveal and tie windows (30 days)
pub const MAX_WINDOW_SECS: i64 = 30 * 24 * 60 * 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("{name} must be positive")]
    NotPositive { name: &'static str },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeConfig {
    pub port: u16,
    pub game: GameConfig,
    /// Credited to every newly registered account
    pub initial_balance: u64,
    /// Use a simulated clock that only moves via `/api/system/tick`
    pub simulated_time: bool,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            game: GameConfig::default(),
            initial_balance: DEFAULT_INITIAL_BALANCE,
            simulated_time: false,
        }
    }
}

impl NodeConfig {
    /// Read `PORT`, `STAKE_AMOUNT`, `REVEAL_WINDOW_SECS`, `TIE_WINDOW_SECS`,
    /// `INITIAL_BALANCE` and `SIMULATED_TIME`. Unset variables keep defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let stake = parse(&lookup, "STAKE_AMOUNT", FIXED_STAKE)?;
        if stake == 0 {
            return Err(ConfigError::NotPositive { name: "STAKE_AMOUNT" });
        }
        let reveal_window = parse_window(&lookup, "REVEAL_WINDOW_SECS", REVEAL_WINDOW_SECS)?;
        let tie_window = parse_window(&lookup, "TIE_WINDOW_SECS", TIE_WINDOW_SECS)?;

        Ok(Self {
            port: parse(&lookup, "PORT", DEFAULT_PORT)?,
            game: GameConfig {
                stake,
                reveal_window,
                tie_window,
            },
            initial_balance: parse(&lookup, "INITIAL_BALANCE", DEFAULT_INITIAL_BALANCE)?,
            simulated_time: parse_flag(&lookup, "SIMULATED_TIME")?,
        })
    }
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

/// A window in whole seconds, in `1..=MAX_WINDOW_SECS`
fn parse_window(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: i64,
) -> Result<Duration, ConfigError> {
    let secs = parse(lookup, name, default)?;
    if secs <= 0 {
        return Err(ConfigError::NotPositive { name });
    }
    if secs > MAX_WINDOW_SECS {
        return Err(ConfigError::Invalid {
            name,
            value: secs.to_string(),
        });
    }
    Duration::try_seconds(secs).ok_or(ConfigError::Invalid {
        name,
        value: secs.to_string(),
    })
}

fn parse_flag(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<bool, ConfigError> {
    match lookup(name).as_deref().map(str::trim) {
        None | Some("") => Ok(false),
        Some("1") | Some("true") | Some("yes") => Ok(true),
        Some("0") | Some("false") | Some("no") => Ok(false),
        Some(other) => Err(ConfigError::Invalid {
            name,
            value: other.to_string(),
        }),
    }
}
