//! Storage Coordinator Module
//!
//! Cache-aside policy over a [`CacheStore`] and a [`DurableStore`]:
//! - writes go to the durable store, which alone decides the outcome
//! - reads try the cache first and repopulate it from the durable store on a miss
//! - removes clear both stores
//!
//! No per-key locking is done here. Per-document atomicity of the durable
//! backend is the only ordering primitive relied upon.

mod outcome;
mod stats;

#[cfg(test)]
pub(crate) mod test_support;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::CacheStore;
use crate::durable::DurableStore;
use crate::error::Result;

pub use outcome::{Outcome, ReplacePolicy};
pub use stats::ReadStats;
use stats::StatsRecorder;

// == Storage Coordinator ==
/// Long-lived coordinator shared by every request.
pub struct StorageCoordinator {
    cache: CacheStore,
    durable: DurableStore,
    replace_policy: ReplacePolicy,
    stats: StatsRecorder,
}

impl StorageCoordinator {
    // == Constructor ==
    pub fn new(cache: CacheStore, durable: DurableStore, replace_policy: ReplacePolicy) -> Self {
        info!(
            "Coordinator ready: cache={}, durable={}, replace_policy={:?}",
            cache.backend_name(),
            durable.backend_name(),
            replace_policy
        );
        Self {
            cache,
            durable,
            replace_policy,
            stats: StatsRecorder::default(),
        }
    }

    pub fn cache_backend(&self) -> &'static str {
        self.cache.backend_name()
    }

    pub fn durable_backend(&self) -> &'static str {
        self.durable.backend_name()
    }

    /// Snapshot of the read-path counters.
    pub fn stats(&self) -> ReadStats {
        self.stats.snapshot()
    }

    // == Create ==
    /// Inserts a new record. Never overwrites and never touches the cache;
    /// the first read populates it.
    pub async fn create(&self, key: &str, value: &Value) -> Result<Outcome> {
        if self.durable.post(key, value).await? {
            Ok(Outcome::Created)
        } else {
            Ok(Outcome::AlreadyExists)
        }
    }

    // == Replace ==
    /// Updates an existing record. Never creates one.
    ///
    /// With [`ReplacePolicy::Invalidate`] the cache entry is dropped after the
    /// durable update, so the next read sees the new value. A cache failure
    /// at that point is returned as an error even though the durable update
    /// went through: the caller cannot be told the write is visible.
    pub async fn replace(&self, key: &str, value: &Value) -> Result<Outcome> {
        if !self.durable.put(key, value).await? {
            return Ok(Outcome::NotFound);
        }

        if self.replace_policy == ReplacePolicy::Invalidate {
            self.cache.delete(key).await?;
        }

        Ok(Outcome::Updated)
    }

    // == Read ==
    /// Returns the current value for `key`, or `None` if no record exists.
    ///
    /// Cache failures never fail a read: the durable store is the fallback.
    /// Durable failures always propagate.
    pub async fn read(&self, key: &str) -> Result<Option<Value>> {
        match self.cached(key).await {
            Ok(Some(value)) => {
                self.stats.record_hit();
                return Ok(Some(value));
            }
            Ok(None) => {
                self.stats.record_miss();
                warn!("no data in cache for key [{}]", key);
            }
            Err(e) => {
                self.stats.record_fallback();
                warn!("cache lookup failed for key [{}], using durable store: {}", key, e);
            }
        }

        match self.durable.get(key).await? {
            Some(value) => {
                self.populate(key, &value).await;
                Ok(Some(value))
            }
            None => {
                info!("no data in durable store for key [{}]", key);
                Ok(None)
            }
        }
    }

    // == Remove ==
    /// Deletes the record and its cache entry. Missing keys are fine.
    ///
    /// The cache is cleared before and after the durable delete. If the cache
    /// cannot be reached the durable record is left alone, otherwise an
    /// orphaned entry could outlive the record once the cache comes back.
    pub async fn remove(&self, key: &str) -> Result<Outcome> {
        self.cache.delete(key).await?;
        self.durable.delete(key).await?;
        // A read that fetched the record before the durable delete may have
        // written it back in between.
        self.cache.delete(key).await?;
        Ok(Outcome::Ok)
    }

    async fn cached(&self, key: &str) -> Result<Option<Value>> {
        if !self.cache.exists(key).await? {
            return Ok(None);
        }
        // The entry can disappear between the two calls; that is a miss.
        self.cache.get(key).await
    }

    /// Best-effort cache fill after a miss.
    ///
    /// After writing, the durable record is read again. If it changed or
    /// vanished since `value` was fetched, a concurrent replace/remove ran in
    /// between and the entry just written is evicted.
    ///
    /// A failed re-read is logged and also evicts; it does not fail the read,
    /// whose value already came from a successful durable lookup.
    async fn populate(&self, key: &str, value: &Value) {
        if let Err(e) = self.cache.put(key, value).await {
            self.stats.record_population_failure();
            warn!("failed to populate cache for key [{}]: {}", key, e);
            return;
        }

        let still_current = match self.durable.get(key).await {
            Ok(current) => current.as_ref() == Some(value),
            Err(e) => {
                warn!("could not revalidate cache entry for key [{}]: {}", key, e);
                false
            }
        };

        if !still_current {
            debug!("record for key [{}] changed during cache fill, evicting", key);
            if let Err(e) = self.cache.delete(key).await {
                warn!("failed to evict cache entry for key [{}]: {}", key, e);
            }
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::test_support::{harness, HangingDocuments};
    use super::*;
    use crate::cache::CacheBackend;
    use crate::durable::DocumentBackend;
    use crate::error::StoreError;
    use serde_json::json;

    #[tokio::test]
    async fn test_read_never_created_key() {
        let h = harness(ReplacePolicy::Invalidate);

        assert_eq!(h.coordinator.read("nope").await.unwrap(), None);
        assert!(h.cache.inner.is_empty().await);
    }

    #[tokio::test]
    async fn test_create_does_not_touch_cache() {
        let h = harness(ReplacePolicy::Invalidate);

        let outcome = h.coordinator.create("7", &json!(125)).await.unwrap();

        assert_eq!(outcome, Outcome::Created);
        assert_eq!(h.cache.switch.calls(), 0);
        assert!(h.cache.inner.is_empty().await);
    }

    #[tokio::test]
    async fn test_create_then_read_warms_cache() {
        let h = harness(ReplacePolicy::Invalidate);
        h.coordinator.create("k", &json!("v")).await.unwrap();

        assert_eq!(h.coordinator.read("k").await.unwrap(), Some(json!("v")));
        assert_eq!(
            h.cache.inner.get("k").await.unwrap().as_deref(),
            Some("\"v\"")
        );

        // Second read is served without the durable store.
        let durable_calls = h.documents.switch.calls();
        h.documents.switch.set_offline(true);
        assert_eq!(h.coordinator.read("k").await.unwrap(), Some(json!("v")));
        assert_eq!(h.documents.switch.calls(), durable_calls);

        let stats = h.coordinator.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[tokio::test]
    async fn test_create_existing_keeps_first_value() {
        let h = harness(ReplacePolicy::Invalidate);

        assert_eq!(
            h.coordinator.create("k", &json!(1)).await.unwrap(),
            Outcome::Created
        );
        assert_eq!(
            h.coordinator.create("k", &json!(2)).await.unwrap(),
            Outcome::AlreadyExists
        );
        assert_eq!(h.coordinator.read("k").await.unwrap(), Some(json!(1)));
    }

    #[tokio::test]
    async fn test_replace_missing_is_not_found() {
        let h = harness(ReplacePolicy::Invalidate);

        assert_eq!(
            h.coordinator.replace("k", &json!(1)).await.unwrap(),
            Outcome::NotFound
        );
        assert_eq!(h.coordinator.read("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_replace_cold_cache() {
        for policy in [ReplacePolicy::Invalidate, ReplacePolicy::LeaveStale] {
            let h = harness(policy);
            h.coordinator.create("6", &json!("key 6")).await.unwrap();

            assert_eq!(
                h.coordinator.replace("6", &json!("key 8")).await.unwrap(),
                Outcome::Updated
            );
            assert_eq!(h.coordinator.read("6").await.unwrap(), Some(json!("key 8")));
        }
    }

    #[tokio::test]
    async fn test_replace_warm_cache_invalidates() {
        let h = harness(ReplacePolicy::Invalidate);
        h.coordinator.create("6", &json!("key 6")).await.unwrap();
        h.coordinator.read("6").await.unwrap();

        h.coordinator.replace("6", &json!("key 8")).await.unwrap();

        assert_eq!(h.coordinator.read("6").await.unwrap(), Some(json!("key 8")));
    }

    #[tokio::test]
    async fn test_replace_warm_cache_leave_stale() {
        let h = harness(ReplacePolicy::LeaveStale);
        h.coordinator.create("6", &json!("key 6")).await.unwrap();
        h.coordinator.read("6").await.unwrap();

        h.coordinator.replace("6", &json!("key 8")).await.unwrap();

        // The warm entry keeps serving the old value until removed.
        assert_eq!(h.coordinator.read("6").await.unwrap(), Some(json!("key 6")));
        h.coordinator.remove("6").await.unwrap();
        assert_eq!(h.coordinator.read("6").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_replace_cache_failure_surfaces() {
        let h = harness(ReplacePolicy::Invalidate);
        h.coordinator.create("k", &json!(1)).await.unwrap();
        h.cache.switch.set_offline(true);

        let result = h.coordinator.replace("k", &json!(2)).await;

        assert!(matches!(result, Err(StoreError::CacheUnavailable(_))));
        // The durable update itself went through.
        assert_eq!(h.documents.inner.find("k").await.unwrap().as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_remove_then_read() {
        let h = harness(ReplacePolicy::Invalidate);
        h.coordinator.create("7", &json!(125)).await.unwrap();
        h.coordinator.read("7").await.unwrap();

        assert_eq!(h.coordinator.remove("7").await.unwrap(), Outcome::Ok);
        assert_eq!(h.coordinator.read("7").await.unwrap(), None);
        assert_eq!(h.coordinator.remove("7").await.unwrap(), Outcome::Ok);
        assert!(h.cache.inner.is_empty().await);
    }

    #[tokio::test]
    async fn test_remove_with_cache_down_keeps_record() {
        let h = harness(ReplacePolicy::Invalidate);
        h.coordinator.create("k", &json!(1)).await.unwrap();
        h.cache.switch.set_offline(true);

        let result = h.coordinator.remove("k").await;

        assert!(matches!(result, Err(StoreError::CacheUnavailable(_))));
        assert!(h.documents.inner.exists("k").await.unwrap());
    }

    #[tokio::test]
    async fn test_read_falls_back_when_cache_down() {
        let h = harness(ReplacePolicy::Invalidate);
        h.coordinator.create("9", &json!({"f": 25, "s": 50})).await.unwrap();
        h.cache.switch.set_offline(true);

        let value = h.coordinator.read("9").await.unwrap();

        assert_eq!(value, Some(json!({"f": 25, "s": 50})));
        let stats = h.coordinator.stats();
        assert_eq!(stats.fallbacks, 1);
        assert_eq!(stats.population_failures, 1);
    }

    #[tokio::test]
    async fn test_read_propagates_durable_failure() {
        let h = harness(ReplacePolicy::Invalidate);
        h.documents.switch.set_offline(true);

        let result = h.coordinator.read("k").await;
        assert!(matches!(result, Err(StoreError::DurableUnavailable(_))));
    }

    #[tokio::test]
    async fn test_read_surfaces_durable_timeout() {
        let timeout = std::time::Duration::from_millis(20);
        let coordinator = StorageCoordinator::new(
            CacheStore::new(std::sync::Arc::new(crate::cache::MemoryCache::new()), timeout),
            DurableStore::new(std::sync::Arc::new(HangingDocuments), timeout),
            ReplacePolicy::Invalidate,
        );

        let result = coordinator.read("k").await;
        assert!(matches!(result, Err(StoreError::DurableUnavailable(_))));
    }

    #[tokio::test]
    async fn test_writes_propagate_durable_failure() {
        let h = harness(ReplacePolicy::Invalidate);
        h.documents.switch.set_offline(true);

        assert!(matches!(
            h.coordinator.create("k", &json!(1)).await,
            Err(StoreError::DurableUnavailable(_))
        ));
        assert!(matches!(
            h.coordinator.replace("k", &json!(1)).await,
            Err(StoreError::DurableUnavailable(_))
        ));
        assert!(matches!(
            h.coordinator.remove("k").await,
            Err(StoreError::DurableUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_corrupt_cache_entry_is_repaired() {
        let h = harness(ReplacePolicy::Invalidate);
        h.coordinator.create("k", &json!([2, 4])).await.unwrap();
        h.cache.inner.set("k", "{garbage".to_string()).await.unwrap();

        assert_eq!(h.coordinator.read("k").await.unwrap(), Some(json!([2, 4])));
        assert_eq!(h.cache.inner.get("k").await.unwrap().as_deref(), Some("[2,4]"));
    }

    #[tokio::test]
    async fn test_populate_evicts_when_record_vanished() {
        let h = harness(ReplacePolicy::Invalidate);

        // Simulate the tail of a read that fetched a value which a concurrent
        // remove has since deleted.
        h.coordinator.populate("gone", &json!("old")).await;

        assert!(!h.cache.inner.exists("gone").await.unwrap());
    }

    #[tokio::test]
    async fn test_populate_evicts_when_revalidation_fails() {
        let h = harness(ReplacePolicy::Invalidate);
        h.documents.switch.set_offline(true);

        h.coordinator.populate("k", &json!(1)).await;

        assert!(!h.cache.inner.exists("k").await.unwrap());
        assert_eq!(h.coordinator.stats().population_failures, 0);
    }

    #[tokio::test]
    async fn test_populate_evicts_when_record_changed() {
        let h = harness(ReplacePolicy::LeaveStale);
        h.coordinator.create("k", &json!("new")).await.unwrap();

        h.coordinator.populate("k", &json!("old")).await;

        assert!(!h.cache.inner.exists("k").await.unwrap());
        assert_eq!(h.coordinator.read("k").await.unwrap(), Some(json!("new")));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_single_winner() {
        let h = harness(ReplacePolicy::Invalidate);

        let first = {
            let coordinator = h.coordinator.clone();
            tokio::spawn(async move { coordinator.create("race", &json!("v1")).await })
        };
        let second = {
            let coordinator = h.coordinator.clone();
            tokio::spawn(async move { coordinator.create("race", &json!("v2")).await })
        };

        let first = first.await.unwrap().unwrap();
        let second = second.await.unwrap().unwrap();

        let winners = [first, second]
            .iter()
            .filter(|o| **o == Outcome::Created)
            .count();
        assert_eq!(winners, 1);
        assert!(first == Outcome::AlreadyExists || second == Outcome::AlreadyExists);

        let expected = if first == Outcome::Created {
            json!("v1")
        } else {
            json!("v2")
        };
        assert_eq!(h.coordinator.read("race").await.unwrap(), Some(expected));
    }

    #[tokio::test]
    async fn test_literal_scenarios() {
        let h = harness(ReplacePolicy::Invalidate);

        assert_eq!(
            h.coordinator.create("7", &json!(125)).await.unwrap(),
            Outcome::Created
        );
        assert_eq!(h.coordinator.read("7").await.unwrap(), Some(json!(125)));
        assert_eq!(h.coordinator.remove("7").await.unwrap(), Outcome::Ok);
        assert_eq!(h.coordinator.read("7").await.unwrap(), None);

        assert_eq!(
            h.coordinator
                .create("9", &json!({"f": 25, "s": 50}))
                .await
                .unwrap(),
            Outcome::Created
        );
        assert_eq!(
            h.coordinator.read("9").await.unwrap(),
            Some(json!({"f": 25, "s": 50}))
        );
    }
}
