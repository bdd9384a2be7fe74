//! KV Façade - a cache-aside key-value server
//!
//! Serves JSON records from a volatile cache in front of a durable document
//! store. The durable store decides every write; the cache only speeds up reads.

pub mod api;
pub mod cache;
pub mod config;
pub mod coordinator;
pub mod durable;
pub mod error;
pub mod models;

pub use api::AppState;
pub use config::Config;
pub use coordinator::{Outcome, ReplacePolicy, StorageCoordinator};
pub use error::StoreError;
