//! Cache Tower - A multi-tier cache façade
//!
//! One logical cache over an ordered stack of storage layers, fastest first.
//! Reads cascade down the stack and promote hits into faster layers; writes
//! and deletes go through every layer.

pub mod adapters;
pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use adapters::{AdapterKind, CacheAdapter, LayerConfig, MemoryAdapter, RedisAdapter};
pub use api::AppState;
pub use cache::{CacheTower, Lookup, TowerStats};
pub use config::Config;
pub use error::{AdapterError, CacheError};
pub use tasks::spawn_cleanup_task;
