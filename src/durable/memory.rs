//! In-memory document backend for local runs and tests.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::durable::DocumentBackend;
use crate::error::Result;

/// Documents held in a `RwLock<HashMap>`; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryDocuments {
    documents: RwLock<HashMap<String, String>>,
}

impl MemoryDocuments {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }
}

#[async_trait]
impl DocumentBackend for MemoryDocuments {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.documents.read().await.contains_key(key))
    }

    async fn find(&self, key: &str) -> Result<Option<String>> {
        Ok(self.documents.read().await.get(key).cloned())
    }

    async fn insert(&self, key: &str, document: String) -> Result<bool> {
        let mut documents = self.documents.write().await;
        match documents.entry(key.to_string()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(document);
                Ok(true)
            }
        }
    }

    async fn update(&self, key: &str, document: String) -> Result<bool> {
        let mut documents = self.documents.write().await;
        match documents.get_mut(key) {
            Some(existing) => {
                *existing = document;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.documents.write().await.remove(key);
        Ok(())
    }
}
