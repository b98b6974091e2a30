//! Redis Adapter Module
//!
//! Networked layer backed by Redis. The connection is opened lazily on first
//! use, so building a tower never touches the network.

use std::time::Duration;

use ::redis::aio::ConnectionManager;
use ::redis::{AsyncCommands, Client};
use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::OnceCell;
use tracing::debug;

use super::{namespaced_key, AdapterKind, CacheAdapter, LayerConfig};
use crate::error::{AdapterError, AdapterResult};

// == Constants ==
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 6379;
const SCAN_BATCH: usize = 256;

// == Redis Adapter ==
/// Redis-backed cache layer.
pub struct RedisAdapter {
    client: Client,
    /// Established on first command, then shared by clones
    connection: OnceCell<ConnectionManager>,
    namespace: String,
    ttl: Option<Duration>,
}

impl RedisAdapter {
    // == Constructor ==
    /// Creates an adapter for the server at `url` without connecting.
    pub fn new(url: &str, namespace: impl Into<String>, ttl: Option<Duration>) -> AdapterResult<Self> {
        Ok(Self {
            client: Client::open(url)?,
            connection: OnceCell::new(),
            namespace: namespace.into(),
            ttl,
        })
    }

    /// Creates an adapter from a layer configuration's params.
    pub fn from_config(config: &LayerConfig) -> AdapterResult<Self> {
        let url = connection_url(&config.params)?;
        Self::new(&url, config.namespace.clone(), config.ttl_duration())
    }

    async fn connection(&self) -> AdapterResult<ConnectionManager> {
        let manager = self
            .connection
            .get_or_try_init(|| async {
                debug!(namespace = %self.namespace, "opening redis connection");
                ConnectionManager::new(self.client.clone()).await
            })
            .await?;
        Ok(manager.clone())
    }

    fn key(&self, key: &str) -> String {
        namespaced_key(&self.namespace, key)
    }
}

/// Builds a `redis://` URL from layer params.
///
/// `url` wins when present; otherwise `host`, `port`, `db` and `password`
/// are assembled with defaults. Unrecognised params are ignored.
/// SCAN MATCH pattern covering every key under `namespace`.
///
/// Glob metacharacters in the namespace are escaped so they match literally.
fn scan_pattern(namespace: &str) -> String {
    let mut pattern = String::with_capacity(namespace.len() + 1);
    for ch in namespace.chars() {
        if matches!(ch, '\\' | '*' | '?' | '[' | ']') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('*');
    pattern
}

fn connection_url(params: &Map<String, Value>) -> AdapterResult<String> {
    if let Some(url) = params.get("url") {
        return url
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| AdapterError::InvalidParams("url must be a string".to_string()));
    }

    let host = match params.get("host") {
        None => DEFAULT_HOST.to_string(),
        Some(Value::String(host)) => host.clone(),
        Some(_) => return Err(AdapterError::InvalidParams("host must be a string".to_string())),
    };
    let port = match params.get("port") {
        None => DEFAULT_PORT,
        Some(value) => value
            .as_u64()
            .and_then(|port| u16::try_from(port).ok())
            .ok_or_else(|| AdapterError::InvalidParams(format!("invalid port: {}", value)))?,
    };
    let db = match params.get("db") {
        None => 0,
        Some(value) => value
            .as_u64()
            .ok_or_else(|| AdapterError::InvalidParams(format!("invalid db: {}", value)))?,
    };
    let auth = match params.get("password").and_then(Value::as_str) {
        Some(password) => format!(":{}@", password),
        None => String::new(),
    };

    Ok(format!("redis://{}{}:{}/{}", auth, host, port, db))
}

#[async_trait]
impl CacheAdapter for RedisAdapter {
    fn kind(&self) -> AdapterKind {
        AdapterKind::Redis
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    async fn get(&self, key: &str) -> AdapterResult<Option<String>> {
        let mut conn = self.connection().await?;
        let value: Option<String> = conn.get(self.key(key)).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> AdapterResult<()> {
        let mut conn = self.connection().await?;
        let full_key = self.key(key);
        // Redis expiry has second granularity; round sub-second TTLs up.
        match ttl.filter(|ttl| !ttl.is_zero()).or(self.ttl) {
            Some(ttl) => {
                let secs = ttl.as_secs() + u64::from(ttl.subsec_nanos() > 0);
                let _: () = conn.set_ex(full_key, value, secs).await?;
            }
            None => {
                let _: () = conn.set(full_key, value).await?;
            }
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> AdapterResult<()> {
        let mut conn = self.connection().await?;
        let _: () = conn.del(self.key(key)).await?;
        Ok(())
    }

    async fn clear(&self) -> AdapterResult<()> {
        let mut conn = self.connection().await?;
        let pattern = scan_pattern(&self.namespace);
        let mut cursor: u64 = 0;
        let mut removed = 0usize;

        loop {
            let (next, keys): (u64, Vec<String>) = ::redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await?;

            if !keys.is_empty() {
                removed += keys.len();
                let _: () = conn.del(keys).await?;
            }
            if next == 0 {
                break;
            }
            cursor = next;
        }

        debug!(namespace = %self.namespace, removed, "redis layer cleared");
        Ok(())
    }

    async fn has(&self, key: &str) -> AdapterResult<bool> {
        let mut conn = self.connection().await?;
        let exists: bool = conn.exists(self.key(key)).await?;
        Ok(exists)
    }
}
