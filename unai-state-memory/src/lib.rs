#![deny(missing_docs)]
//! In-memory implementation of unai's [`StateStore`] trait.
//!
//! Uses a `HashMap` behind a `RwLock` for concurrent access. Nothing
//! survives the process; use it for tests and throwaway sessions.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use unai_types::{StateStore, StorageError};

/// In-memory state store backed by a `HashMap` behind a `RwLock`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<HashMap<String, serde_json::Value>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the given entries.
    pub fn with_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, serde_json::Value)>,
        K: Into<String>,
    {
        Self {
            data: RwLock::new(entries.into_iter().map(|(k, v)| (k.into(), v)).collect()),
        }
    }

    /// Keys currently stored, in no particular order.
    pub async fn keys(&self) -> Vec<String> {
        self.data.read().await.keys().cloned().collect()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn read(&self, key: &str) -> Result<Option<serde_json::Value>, StorageError> {
        let data = self.data.read().await;
        Ok(data.get(key).cloned())
    }

    async fn write(&self, key: &str, value: serde_json::Value) -> Result<(), StorageError> {
        let mut data = self.data.write().await;
        data.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let mut data = self.data.write().await;
        data.remove(key);
        Ok(())
    }
}
