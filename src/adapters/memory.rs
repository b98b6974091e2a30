//! Memory Adapter Module
//!
//! In-process layer: a HashMap guarded by an async RwLock, with per-entry TTL.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{namespaced_key, AdapterKind, CacheAdapter, LayerConfig, StoredEntry};
use crate::error::AdapterResult;

// == Memory Adapter ==
/// In-process cache layer.
///
/// Expired entries are invisible to reads and are dropped lazily on access or
/// in bulk by [`CacheAdapter::purge_expired`].
#[derive(Debug, Default)]
pub struct MemoryAdapter {
    /// Namespaced key -> entry
    entries: RwLock<HashMap<String, StoredEntry>>,
    /// Key prefix
    namespace: String,
    /// Default TTL for writes, None = never expire
    ttl: Option<Duration>,
}

impl MemoryAdapter {
    // == Constructor ==
    /// Creates an adapter with no namespace and no expiry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an adapter with the given namespace and default TTL.
    pub fn with_options(namespace: impl Into<String>, ttl: Option<Duration>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            namespace: namespace.into(),
            ttl,
        }
    }

    /// Creates an adapter from a layer configuration. Memory layers take no params.
    pub fn from_config(config: &LayerConfig) -> Self {
        Self::with_options(config.namespace.clone(), config.ttl_duration())
    }

    // == Length ==
    /// Number of stored entries, including expired ones not yet purged.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Remaining lifetime of `key`; outer None on a miss, inner None if it never expires.
    pub async fn ttl_remaining(&self, key: &str) -> Option<Option<Duration>> {
        let entries = self.entries.read().await;
        entries
            .get(&namespaced_key(&self.namespace, key))
            .filter(|entry| !entry.is_expired())
            .map(StoredEntry::ttl_remaining)
    }

    /// Looks up a live entry, removing it if it has expired.
    async fn live_value(&self, full_key: &str) -> Option<String> {
        {
            let entries = self.entries.read().await;
            match entries.get(full_key) {
                None => return None,
                Some(entry) if !entry.is_expired() => return Some(entry.value.clone()),
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write().await;
        if entries.get(full_key).is_some_and(StoredEntry::is_expired) {
            entries.remove(full_key);
            debug!(key = %full_key, "memory layer dropped expired entry");
        }
        None
    }
}

#[async_trait]
impl CacheAdapter for MemoryAdapter {
    fn kind(&self) -> AdapterKind {
        AdapterKind::Memory
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    async fn get(&self, key: &str) -> AdapterResult<Option<String>> {
        Ok(self.live_value(&namespaced_key(&self.namespace, key)).await)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> AdapterResult<()> {
        let effective_ttl = ttl.filter(|ttl| !ttl.is_zero()).or(self.ttl);
        let entry = StoredEntry::new(value.to_string(), effective_ttl);

        let mut entries = self.entries.write().await;
        entries.insert(namespaced_key(&self.namespace, key), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> AdapterResult<()> {
        let mut entries = self.entries.write().await;
        entries.remove(&namespaced_key(&self.namespace, key));
        Ok(())
    }

    async fn clear(&self) -> AdapterResult<()> {
        let mut entries = self.entries.write().await;
        entries.retain(|key, _| !key.starts_with(&self.namespace));
        Ok(())
    }

    async fn has(&self, key: &str) -> AdapterResult<bool> {
        Ok(self
            .live_value(&namespaced_key(&self.namespace, key))
            .await
            .is_some())
    }

    async fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        before - entries.len()
    }
}
