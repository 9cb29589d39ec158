//! Configuration Module
//!
//! Handles loading cache and workload configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::cache::DEFAULT_TTL_SECS;

const DEFAULT_CAPACITY: usize = 1000;
const DEFAULT_WORKERS: usize = 4;
const DEFAULT_ITERATIONS: usize = 10_000;

/// Cache and workload configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
/// Missing fields fall back to the same defaults when deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// Default TTL in seconds for entries added without an explicit expiry
    pub default_ttl: u64,
    /// Worker threads used by the workload runner
    pub workers: usize,
    /// Workload iterations per worker
    pub iterations: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `INMEM_CAPACITY` - Maximum cache entries (default: 1000)
    /// - `INMEM_DEFAULT_TTL` - Default TTL in seconds (default: 300)
    /// - `INMEM_WORKERS` - Workload threads (default: 4)
    /// - `INMEM_ITERATIONS` - Workload iterations per thread (default: 10000)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from an arbitrary variable lookup.
    ///
    /// Unparseable values fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            capacity: parse_or(&lookup, "INMEM_CAPACITY", DEFAULT_CAPACITY),
            default_ttl: parse_or(&lookup, "INMEM_DEFAULT_TTL", DEFAULT_TTL_SECS),
            workers: parse_or(&lookup, "INMEM_WORKERS", DEFAULT_WORKERS),
            iterations: parse_or(&lookup, "INMEM_ITERATIONS", DEFAULT_ITERATIONS),
        }
    }

    /// Default TTL as a Duration.
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl)
    }
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(name)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            default_ttl: DEFAULT_TTL_SECS,
            workers: DEFAULT_WORKERS,
            iterations: DEFAULT_ITERATIONS,
        }
    }
}
