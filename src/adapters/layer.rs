//! Layer Configuration Module
//!
//! Declarative layer records and the tag table that turns them into adapters.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{MemoryAdapter, RedisAdapter, SharedAdapter};
use crate::error::{CacheError, Result};

// == Adapter Kind ==
/// Every adapter kind a layer configuration can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AdapterKind {
    /// In-process map
    Memory,
    /// Networked Redis store
    Redis,
}

/// Type tags accepted in layer configurations.
const REGISTRATIONS: &[(&str, AdapterKind)] = &[
    ("memory", AdapterKind::Memory),
    ("in-process", AdapterKind::Memory),
    ("redis", AdapterKind::Redis),
    ("networked", AdapterKind::Redis),
];

impl AdapterKind {
    /// Canonical type tag.
    pub fn tag(self) -> &'static str {
        match self {
            AdapterKind::Memory => "memory",
            AdapterKind::Redis => "redis",
        }
    }

    /// Instantiates an adapter of this kind from `config`.
    pub fn build(self, config: &LayerConfig) -> Result<SharedAdapter> {
        match self {
            AdapterKind::Memory => Ok(Arc::new(MemoryAdapter::from_config(config))),
            AdapterKind::Redis => {
                let adapter = RedisAdapter::from_config(config)
                    .map_err(|e| CacheError::InvalidConfig(format!("{}: {}", self.tag(), e)))?;
                Ok(Arc::new(adapter))
            }
        }
    }
}

impl FromStr for AdapterKind {
    type Err = CacheError;

    fn from_str(tag: &str) -> Result<Self> {
        let normalized = tag.trim().to_ascii_lowercase();
        REGISTRATIONS
            .iter()
            .find(|(name, _)| *name == normalized)
            .map(|(_, kind)| *kind)
            .ok_or_else(|| CacheError::UnsupportedAdapter(tag.to_string()))
    }
}

impl fmt::Display for AdapterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// == Layer Config ==
/// Construction-time description of one layer.
///
/// ```json
/// { "adapter": "redis", "namespace": "redis-", "ttl": 3600,
///   "params": { "host": "localhost", "port": 6379, "db": 0 } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerConfig {
    /// Adapter type tag, resolved through the registration table
    pub adapter: String,
    /// Prefix applied to every key in this layer
    #[serde(default)]
    pub namespace: String,
    /// Default TTL in seconds for writes; 0 = no expiry
    #[serde(default)]
    pub ttl: u64,
    /// Adapter-specific connection parameters
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl LayerConfig {
    /// Creates a config for `adapter` with no namespace, TTL or params.
    pub fn new(adapter: impl Into<String>) -> Self {
        Self {
            adapter: adapter.into(),
            ..Self::default()
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_ttl(mut self, ttl_secs: u64) -> Self {
        self.ttl = ttl_secs;
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// TTL as a duration, None when the layer never expires entries.
    pub fn ttl_duration(&self) -> Option<Duration> {
        (self.ttl > 0).then(|| Duration::from_secs(self.ttl))
    }

    /// Resolves the type tag and instantiates the adapter.
    pub fn build(&self) -> Result<SharedAdapter> {
        self.adapter.parse::<AdapterKind>()?.build(self)
    }

    // == Parse Declaration ==
    /// Parses a JSON layer declaration.
    ///
    /// A list yields one config per element. An empty list or empty object
    /// means "no layers". An absent or null declaration is rejected so callers
    /// must say "no layers" explicitly.
    pub fn parse_declaration(declaration: Option<&Value>) -> Result<Vec<LayerConfig>> {
        match declaration {
            None | Some(Value::Null) => Err(CacheError::MissingLayers),
            Some(Value::Array(layers)) => layers
                .iter()
                .enumerate()
                .map(|(index, layer)| {
                    LayerConfig::deserialize(layer)
                        .map_err(|e| CacheError::InvalidConfig(format!("layer {}: {}", index, e)))
                })
                .collect(),
            Some(Value::Object(map)) if map.is_empty() => Ok(Vec::new()),
            Some(other) => Err(CacheError::InvalidConfig(format!(
                "expected a list of layer configurations, got {}",
                other
            ))),
        }
    }
}
