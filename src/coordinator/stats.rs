//! Read Path Statistics Module
//!
//! Tracks how reads were served: cache hits, misses, fast-path fallbacks and
//! failed cache populations.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Read Stats ==
/// Point-in-time snapshot of the read counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReadStats {
    /// Reads answered from the cache
    pub hits: u64,
    /// Reads that found no cache entry and went to the durable store
    pub misses: u64,
    /// Reads whose cache lookup failed and fell back to the durable store
    pub fallbacks: u64,
    /// Cache writes after a miss that failed and were swallowed
    pub population_failures: u64,
}

impl ReadStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses + fallbacks), or 0.0 if no reads were made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses + self.fallbacks;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Stats Recorder ==
/// Lock-free counters shared by concurrent reads.
#[derive(Debug, Default)]
pub(crate) struct StatsRecorder {
    hits: AtomicU64,
    misses: AtomicU64,
    fallbacks: AtomicU64,
    population_failures: AtomicU64,
}

impl StatsRecorder {
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fallback(&self) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_population_failure(&self) {
        self.population_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ReadStats {
        ReadStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            fallbacks: self.fallbacks.load(Ordering::Relaxed),
            population_failures: self.population_failures.load(Ordering::Relaxed),
        }
    }
}
