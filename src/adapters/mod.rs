//! Adapters Module
//!
//! The capability contract every cache layer satisfies, plus the concrete
//! in-process and Redis-backed implementations.

mod entry;
mod layer;
mod memory;
mod redis;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::AdapterResult;

// Re-export public types
pub use entry::StoredEntry;
pub use layer::{AdapterKind, LayerConfig};
pub use memory::MemoryAdapter;
pub use self::redis::RedisAdapter;

/// Shared handle to a layer's adapter, as held by the registry.
pub type SharedAdapter = Arc<dyn CacheAdapter>;

// == Capability Contract ==
/// Operations a storage medium must provide to serve as one tower layer.
///
/// Implementations apply their own namespace prefix to every key and their own
/// default TTL to every write that does not carry one, so callers stay
/// unaware of both. A missing key is `Ok(None)` / `Ok(false)`, never an error;
/// errors are reserved for the backing store itself failing.
#[async_trait]
pub trait CacheAdapter: Send + Sync {
    /// Which registered adapter kind this is.
    fn kind(&self) -> AdapterKind;

    /// Prefix applied to every key this adapter stores.
    fn namespace(&self) -> &str;

    /// Default lifetime for writes; None means entries never expire.
    fn ttl(&self) -> Option<Duration>;

    /// Fetches the value for `key`, `Ok(None)` on a miss.
    async fn get(&self, key: &str) -> AdapterResult<Option<String>>;

    /// Unconditional upsert. `ttl` of None uses the adapter default.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> AdapterResult<()>;

    /// Removes `key`; removing an absent key succeeds.
    async fn delete(&self, key: &str) -> AdapterResult<()>;

    /// Removes every key within this adapter's namespace.
    async fn clear(&self) -> AdapterResult<()>;

    /// Reports whether `key` is present without fetching it.
    async fn has(&self, key: &str) -> AdapterResult<bool>;

    /// Drops entries whose TTL has elapsed and returns how many were removed.
    ///
    /// Stores that expire keys on their own keep the default.
    async fn purge_expired(&self) -> usize {
        0
    }
}

/// Joins an adapter namespace and a caller key into the stored key.
pub fn namespaced_key(namespace: &str, key: &str) -> String {
    let mut full = String::with_capacity(namespace.len() + key.len());
    full.push_str(namespace);
    full.push_str(key);
    full
}
