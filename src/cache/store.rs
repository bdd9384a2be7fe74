//! Cache Store Module
//!
//! Typed façade over a [`CacheBackend`]: JSON encoding, per-call timeouts and
//! operation logging.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::cache::CacheBackend;
use crate::error::{Result, StoreError};

// == Cache Store ==
/// Typed cache façade shared by all requests.
#[derive(Clone)]
pub struct CacheStore {
    /// Underlying key-value backend
    backend: Arc<dyn CacheBackend>,
    /// Upper bound for a single backend call
    timeout: Duration,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore over `backend`.
    ///
    /// # Arguments
    /// * `backend` - Cache backend implementation
    /// * `timeout` - Maximum duration of one backend call
    pub fn new(backend: Arc<dyn CacheBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    /// Name of the wrapped backend.
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    // == Exists ==
    /// Returns true iff an entry for `key` is currently cached.
    pub async fn exists(&self, key: &str) -> Result<bool> {
        debug!("cache exists for key [{}]", key);
        self.bounded(self.backend.exists(key)).await
    }

    // == Put ==
    /// Unconditionally overwrites the entry for `key`. Always returns true.
    pub async fn put(&self, key: &str, value: &Value) -> Result<bool> {
        debug!("cache put for key [{}]", key);
        let raw = value.to_string();
        self.bounded(self.backend.set(key, raw)).await?;
        Ok(true)
    }

    // == Get ==
    /// Retrieves the cached value, or `None` when absent.
    ///
    /// A stored value that does not parse as JSON is reported as
    /// `StoreError::CorruptEntry`.
    pub async fn get(&self, key: &str) -> Result<Option<Value>> {
        debug!("cache get for key [{}]", key);
        let raw = self.bounded(self.backend.get(key)).await?;

        raw.map(|text| {
            serde_json::from_str(&text).map_err(|e| StoreError::CorruptEntry {
                key: key.to_string(),
                reason: e.to_string(),
            })
        })
        .transpose()
    }

    // == Delete ==
    /// Removes the entry if present.
    pub async fn delete(&self, key: &str) -> Result<()> {
        debug!("cache delete for key [{}]", key);
        self.bounded(self.backend.delete(key)).await
    }

    async fn bounded<T>(&self, op: impl Future<Output = Result<T>>) -> Result<T> {
        match tokio::time::timeout(self.timeout, op).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::CacheUnavailable(format!(
                "{} call timed out after {}ms",
                self.backend.name(),
                self.timeout.as_millis()
            ))),
        }
    }
}
