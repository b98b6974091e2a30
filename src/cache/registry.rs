//! Layer Registry Module
//!
//! Ordered, gap-free sequence of adapters, fastest first.

use std::sync::Arc;

use serde::Serialize;

use crate::adapters::{AdapterKind, CacheAdapter, SharedAdapter};
use crate::error::{CacheError, Result};

// == Layer Info ==
/// Describes one registered layer for reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerInfo {
    /// Registry position
    pub index: usize,
    /// Adapter kind
    pub adapter: AdapterKind,
    /// Key prefix
    pub namespace: String,
    /// Default TTL in seconds, None = no expiry
    pub ttl: Option<u64>,
}

// == Layer Registry ==
/// Positions are always `0..len`; the only way to grow is to write at `len`.
#[derive(Clone, Default)]
pub struct LayerRegistry {
    layers: Vec<SharedAdapter>,
}

impl LayerRegistry {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_adapters(adapters: Vec<SharedAdapter>) -> Self {
        Self { layers: adapters }
    }

    // == Views ==
    /// The live sequence of adapters.
    pub fn as_slice(&self) -> &[SharedAdapter] {
        &self.layers
    }

    /// The live sequence, mutably. A `Vec` cannot hold gaps, so any edit made
    /// through it keeps positions contiguous.
    pub fn as_mut_vec(&mut self) -> &mut Vec<SharedAdapter> {
        &mut self.layers
    }

    /// Copies the adapter handles so later registry changes are not observed.
    pub fn snapshot(&self) -> Vec<SharedAdapter> {
        self.layers.iter().map(Arc::clone).collect()
    }

    // == Replace All ==
    /// Drops every current layer, then installs `adapters` in order.
    pub fn replace_all(&mut self, adapters: impl IntoIterator<Item = SharedAdapter>) {
        self.layers.clear();
        self.layers.extend(adapters);
    }

    // == Set ==
    /// Writes `adapter` at `index`.
    ///
    /// `index == len` appends, `index < len` replaces, anything larger would
    /// leave a hole and is rejected without touching the registry.
    pub fn set(&mut self, adapter: SharedAdapter, index: usize) -> Result<()> {
        let len = self.layers.len();
        if index < len {
            self.layers[index] = adapter;
        } else if index == len {
            self.layers.push(adapter);
        } else {
            return Err(CacheError::LayerIndexOutOfRange { index, len });
        }
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&SharedAdapter> {
        self.layers.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SharedAdapter> {
        self.layers.iter()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Reports kind, namespace and TTL of every layer in order.
    pub fn describe(&self) -> Vec<LayerInfo> {
        self.layers
            .iter()
            .enumerate()
            .map(|(index, adapter)| LayerInfo {
                index,
                adapter: adapter.kind(),
                namespace: adapter.namespace().to_string(),
                ttl: adapter.ttl().map(|ttl| ttl.as_secs()),
            })
            .collect()
    }
}
