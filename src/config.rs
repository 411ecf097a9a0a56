//! Configuration Module
//!
//! Loads memoization defaults from environment variables.

use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{MemoError, Result};

/// Memoization defaults.
///
/// Turned into per-function options with
/// [`MemoizeOptions::from_config`](crate::MemoizeOptions::from_config).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Max age of cached results in milliseconds, zero or negative = never expire
    pub max_age_ms: i64,
    /// Capacity of the LRU backend, zero = unbounded in-memory map
    pub max_entries: usize,
}

impl Config {
    /// Creates a new Config from environment variables, falling back to
    /// defaults for missing or malformed values.
    ///
    /// # Environment Variables
    /// - `MEMO_MAX_AGE_MS` - Max age in milliseconds (default: 0, never expire)
    /// - `MEMO_MAX_ENTRIES` - LRU capacity (default: 0, unbounded)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_age_ms: env::var("MEMO_MAX_AGE_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_age_ms),
            max_entries: env::var("MEMO_MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_entries),
        }
    }

    /// Like [`from_env`](Self::from_env), but malformed values are errors.
    pub fn try_from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads settings through `lookup` (variable name to raw value).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            max_age_ms: parse_var(&lookup, "MEMO_MAX_AGE_MS")?.unwrap_or(defaults.max_age_ms),
            max_entries: parse_var(&lookup, "MEMO_MAX_ENTRIES")?
                .unwrap_or(defaults.max_entries),
        };
        info!(
            "Memo configuration loaded: max_age_ms={}, max_entries={}",
            config.max_age_ms, config.max_entries
        );
        Ok(config)
    }
}

fn parse_var<F, T>(lookup: &F, name: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|err| MemoError::Config(format!("{name}={raw:?}: {err}"))),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_age_ms: 0,
            max_entries: 0,
        }
    }
}
