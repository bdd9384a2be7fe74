//! Durable Store Module
//!
//! Typed façade over a [`DocumentBackend`]. Every failure here is fatal for
//! the operation in flight and is returned to the caller unchanged.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::durable::DocumentBackend;
use crate::error::{Result, StoreError};

// == Durable Store ==
/// Typed durable-store façade shared by all requests.
#[derive(Clone)]
pub struct DurableStore {
    backend: Arc<dyn DocumentBackend>,
    timeout: Duration,
}

impl DurableStore {
    // == Constructor ==
    /// Creates a new DurableStore over `backend`.
    ///
    /// # Arguments
    /// * `backend` - Document backend implementation
    /// * `timeout` - Maximum duration of one backend call
    pub fn new(backend: Arc<dyn DocumentBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    // == Exists ==
    pub async fn exists(&self, key: &str) -> Result<bool> {
        debug!("durable exists for key [{}]", key);
        self.bounded(self.backend.exists(key)).await
    }

    // == Post ==
    /// Inserts a new record iff none exists for `key`.
    ///
    /// Returns false, without mutating anything, when the key is taken.
    pub async fn post(&self, key: &str, value: &Value) -> Result<bool> {
        debug!("durable post for key [{}]", key);
        self.bounded(self.backend.insert(key, value.to_string())).await
    }

    // == Put ==
    /// Updates the record iff one exists for `key`. Never creates.
    pub async fn put(&self, key: &str, value: &Value) -> Result<bool> {
        debug!("durable put for key [{}]", key);
        self.bounded(self.backend.update(key, value.to_string())).await
    }

    // == Get ==
    pub async fn get(&self, key: &str) -> Result<Option<Value>> {
        debug!("durable get for key [{}]", key);
        let raw = self.bounded(self.backend.find(key)).await?;

        raw.map(|text| {
            serde_json::from_str(&text).map_err(|e| StoreError::CorruptEntry {
                key: key.to_string(),
                reason: e.to_string(),
            })
        })
        .transpose()
    }

    // == Delete ==
    pub async fn delete(&self, key: &str) -> Result<()> {
        debug!("durable delete for key [{}]", key);
        self.bounded(self.backend.delete(key)).await
    }

    async fn bounded<T>(&self, op: impl Future<Output = Result<T>>) -> Result<T> {
        match tokio::time::timeout(self.timeout, op).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::DurableUnavailable(format!(
                "{} call timed out after {}ms",
                self.backend.name(),
                self.timeout.as_millis()
            ))),
        }
    }
}
