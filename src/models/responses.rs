//! Response DTOs for the auxiliary endpoints and error bodies.

use serde::Serialize;

use crate::coordinator::ReadStats;

/// Response body for the stats endpoint (GET /-/stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Reads answered from the cache
    pub hits: u64,
    /// Reads that missed the cache
    pub misses: u64,
    /// Reads whose cache lookup failed
    pub fallbacks: u64,
    /// Swallowed cache population failures
    pub population_failures: u64,
    /// Hit rate (hits / all reads)
    pub hit_rate: f64,
    /// Cache backend in use
    pub cache_backend: String,
    /// Durable backend in use
    pub durable_backend: String,
}

impl StatsResponse {
    /// Creates a new StatsResponse from a stats snapshot
    pub fn new(
        stats: &ReadStats,
        cache_backend: impl Into<String>,
        durable_backend: impl Into<String>,
    ) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            fallbacks: stats.fallbacks,
            population_failures: stats.population_failures,
            hit_rate: stats.hit_rate(),
            cache_backend: cache_backend.into(),
            durable_backend: durable_backend.into(),
        }
    }
}

/// Response body for the health endpoint (GET /-/health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
