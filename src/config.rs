//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::coordinator::ReplacePolicy;

/// Which implementation backs the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackendKind {
    Redis,
    Memory,
}

impl FromStr for CacheBackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(CacheBackendKind::Redis),
            "memory" => Ok(CacheBackendKind::Memory),
            other => Err(format!("unknown cache backend '{}'", other)),
        }
    }
}

/// Which implementation backs the durable store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurableBackendKind {
    Sqlite,
    Memory,
}

impl FromStr for DurableBackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(DurableBackendKind::Sqlite),
            "memory" => Ok(DurableBackendKind::Memory),
            other => Err(format!("unknown durable backend '{}'", other)),
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Cache implementation
    pub cache_backend: CacheBackendKind,
    /// Redis connection URL
    pub cache_url: String,
    /// Durable store implementation
    pub durable_backend: DurableBackendKind,
    /// SQLite connection URL
    pub database_url: String,
    /// SQLite pool size
    pub db_max_connections: u32,
    /// Upper bound for any single backend call, in milliseconds
    pub backend_timeout_ms: u64,
    /// What replace does to a warm cache entry
    pub replace_policy: ReplacePolicy,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 4567)
    /// - `CACHE_BACKEND` - `redis` or `memory` (default: redis)
    /// - `CACHE_URL` - Redis URL (default: redis://cache:6379)
    /// - `DURABLE_BACKEND` - `sqlite` or `memory` (default: sqlite)
    /// - `DATABASE_URL` - SQLite URL (default: sqlite://records.db?mode=rwc)
    /// - `DB_MAX_CONNECTIONS` - SQLite pool size (default: 5)
    /// - `BACKEND_TIMEOUT_MS` - Per-call backend timeout (default: 2000)
    /// - `CACHE_INVALIDATE_ON_REPLACE` - Drop warm entries on replace (default: true)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cache_backend: parse_var("CACHE_BACKEND").unwrap_or(defaults.cache_backend),
            cache_url: env::var("CACHE_URL").unwrap_or(defaults.cache_url),
            durable_backend: parse_var("DURABLE_BACKEND").unwrap_or(defaults.durable_backend),
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            db_max_connections: parse_var("DB_MAX_CONNECTIONS")
                .unwrap_or(defaults.db_max_connections),
            backend_timeout_ms: parse_var("BACKEND_TIMEOUT_MS")
                .unwrap_or(defaults.backend_timeout_ms),
            replace_policy: parse_var("CACHE_INVALIDATE_ON_REPLACE")
                .unwrap_or(defaults.replace_policy),
        }
    }

    pub fn backend_timeout(&self) -> Duration {
        Duration::from_millis(self.backend_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 4567,
            cache_backend: CacheBackendKind::Redis,
            cache_url: "redis://cache:6379".to_string(),
            durable_backend: DurableBackendKind::Sqlite,
            database_url: "sqlite://records.db?mode=rwc".to_string(),
            db_max_connections: 5,
            backend_timeout_ms: 2000,
            replace_policy: ReplacePolicy::Invalidate,
        }
    }
}

/// Reads and parses `name`, treating missing or unparseable values as unset.
fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}
