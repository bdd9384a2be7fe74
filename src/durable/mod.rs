//! Durable Store Module
//!
//! Source of truth for every record. Backends persist JSON documents keyed by
//! the caller's key; [`DurableStore`] adds typing and call timeouts.

mod memory;
mod sqlite;
mod store;

use async_trait::async_trait;

use crate::error::Result;

pub use memory::MemoryDocuments;
pub use sqlite::SqliteDocuments;
pub use store::DurableStore;

// == Document Backend ==
/// A single document-oriented backend.
///
/// Each call must be atomic per document: `insert` and `update` decide and
/// mutate in one backend step so concurrent callers cannot both win.
/// Connectivity problems are reported as `StoreError::DurableUnavailable`.
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// Short backend name used in logs.
    fn name(&self) -> &'static str;

    async fn exists(&self, key: &str) -> Result<bool>;

    async fn find(&self, key: &str) -> Result<Option<String>>;

    /// Inserts iff no document exists for `key`. Returns whether it inserted.
    async fn insert(&self, key: &str, document: String) -> Result<bool>;

    /// Updates iff a document exists for `key`. Returns whether it updated.
    async fn update(&self, key: &str, document: String) -> Result<bool>;

    /// Removes the document. Missing keys are not an error.
    async fn delete(&self, key: &str) -> Result<()>;
}
