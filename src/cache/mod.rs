//! Cache Module
//!
//! Volatile key-value accelerator in front of the durable store. Backends
//! store raw JSON text; [`CacheStore`] adds typing and call timeouts.

mod memory;
mod redis_cache;
mod store;

use async_trait::async_trait;

use crate::error::Result;

// Re-export public types
pub use memory::MemoryCache;
pub use redis_cache::RedisCache;
pub use store::CacheStore;

// == Cache Backend ==
/// A single key-value cache backend.
///
/// Implementations must be safe for concurrent use. Connectivity problems are
/// reported as `StoreError::CacheUnavailable`, never as a missing key.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Short backend name used in logs.
    fn name(&self) -> &'static str;

    async fn exists(&self, key: &str) -> Result<bool>;

    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrites or creates the entry.
    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// Removes the entry. Missing keys are not an error.
    async fn delete(&self, key: &str) -> Result<()>;
}
