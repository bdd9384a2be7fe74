//! Instrumented backends for coordinator tests: call counters plus an
//! offline switch that makes every call fail like an unreachable server,
//! and a document backend whose calls never complete.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::cache::{CacheBackend, CacheStore, MemoryCache};
use crate::coordinator::{ReplacePolicy, StorageCoordinator};
use crate::durable::{DocumentBackend, DurableStore, MemoryDocuments};
use crate::error::{Result, StoreError};

#[derive(Default)]
pub struct Switch {
    offline: AtomicBool,
    calls: AtomicUsize,
}

impl Switch {
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.offline.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
pub struct FlakyCache {
    pub inner: MemoryCache,
    pub switch: Switch,
}

impl FlakyCache {
    fn check(&self) -> Result<()> {
        if self.switch.enter() {
            return Err(StoreError::CacheUnavailable("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl CacheBackend for FlakyCache {
    fn name(&self) -> &'static str {
        "flaky-cache"
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        self.check()?;
        self.inner.exists(key).await
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.check()?;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.check()?;
        self.inner.set(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.check()?;
        self.inner.delete(key).await
    }
}

#[derive(Default)]
pub struct FlakyDocuments {
    pub inner: MemoryDocuments,
    pub switch: Switch,
}

impl FlakyDocuments {
    fn check(&self) -> Result<()> {
        if self.switch.enter() {
            return Err(StoreError::DurableUnavailable("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentBackend for FlakyDocuments {
    fn name(&self) -> &'static str {
        "flaky-documents"
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        self.check()?;
        self.inner.exists(key).await
    }

    async fn find(&self, key: &str) -> Result<Option<String>> {
        self.check()?;
        self.inner.find(key).await
    }

    async fn insert(&self, key: &str, document: String) -> Result<bool> {
        self.check()?;
        self.inner.insert(key, document).await
    }

    async fn update(&self, key: &str, document: String) -> Result<bool> {
        self.check()?;
        self.inner.update(key, document).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.check()?;
        self.inner.delete(key).await
    }
}

/// Document backend whose calls never complete.
pub struct HangingDocuments;

#[async_trait]
impl DocumentBackend for HangingDocuments {
    fn name(&self) -> &'static str {
        "hanging"
    }

    async fn exists(&self, _key: &str) -> Result<bool> {
        std::future::pending().await
    }

    async fn find(&self, _key: &str) -> Result<Option<String>> {
        std::future::pending().await
    }

    async fn insert(&self, _key: &str, _document: String) -> Result<bool> {
        std::future::pending().await
    }

    async fn update(&self, _key: &str, _document: String) -> Result<bool> {
        std::future::pending().await
    }

    async fn delete(&self, _key: &str) -> Result<()> {
        std::future::pending().await
    }
}

pub struct Harness {
    pub cache: Arc<FlakyCache>,
    pub documents: Arc<FlakyDocuments>,
    pub coordinator: Arc<StorageCoordinator>,
}

pub fn harness(policy: ReplacePolicy) -> Harness {
    let cache = Arc::new(FlakyCache::default());
    let documents = Arc::new(FlakyDocuments::default());
    let timeout = Duration::from_secs(1);

    let coordinator = Arc::new(StorageCoordinator::new(
        CacheStore::new(cache.clone(), timeout),
        DurableStore::new(documents.clone(), timeout),
        policy,
    ));

    Harness {
        cache,
        documents,
        coordinator,
    }
}
