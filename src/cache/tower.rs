//! Cache Tower Module
//!
//! One logical cache over an ordered stack of adapters: cascading reads with
//! promotion, write-through, and cascading delete/clear.

use serde_json::Value;
use tracing::{debug, warn};

use crate::adapters::{CacheAdapter, LayerConfig, SharedAdapter};
use crate::cache::{LayerInfo, LayerRegistry, StatsRecorder, TowerStats};
use crate::error::{CacheError, LayerFailure, Result};

// == Lookup ==
/// Outcome of a cascading read.
#[derive(Debug, Default)]
pub struct Lookup {
    /// The value, if any layer held it
    pub value: Option<String>,
    /// Position of the layer that answered
    pub layer: Option<usize>,
    /// Layers that failed while reading or while being promoted into
    pub failures: Vec<LayerFailure>,
}

impl Lookup {
    pub fn is_hit(&self) -> bool {
        self.value.is_some()
    }
}

// == Cache Tower ==
/// Multi-tier cache façade.
///
/// Layer 0 is consulted first and should be the fastest. Structural changes
/// (`set_adapter`, `set_adapters`, `adapters_mut`) need `&mut self`; data
/// operations only need `&self`, so callers sharing a tower across tasks put
/// it behind a read-write lock and take the write side only to restructure.
#[derive(Default)]
pub struct CacheTower {
    registry: LayerRegistry,
    stats: StatsRecorder,
}

impl CacheTower {
    // == Constructors ==
    /// Creates a tower with no layers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a tower over `adapters`, fastest first.
    pub fn with_adapters(adapters: Vec<SharedAdapter>) -> Self {
        Self {
            registry: LayerRegistry::from_adapters(adapters),
            stats: StatsRecorder::new(),
        }
    }

    /// Instantiates one adapter per configuration, in order.
    ///
    /// Fails on the first configuration that cannot be built; no partial
    /// tower is returned.
    pub fn from_configs(configs: &[LayerConfig]) -> Result<Self> {
        let adapters = configs
            .iter()
            .map(LayerConfig::build)
            .collect::<Result<Vec<_>>>()?;
        debug!(layers = adapters.len(), "cache tower built from configuration");
        Ok(Self::with_adapters(adapters))
    }

    /// Builds a tower from a JSON layer declaration.
    ///
    /// `[]` or `{}` gives an empty tower; an absent or null declaration is
    /// rejected with [`CacheError::MissingLayers`].
    pub fn from_declaration(declaration: Option<&Value>) -> Result<Self> {
        let configs = LayerConfig::parse_declaration(declaration)?;
        Self::from_configs(&configs)
    }

    // == Registry Management ==
    /// The live registry. Entries are shared handles, so a handle taken here
    /// keeps pointing at its adapter even after the registry is rearranged.
    pub fn adapters(&self) -> &[SharedAdapter] {
        self.registry.as_slice()
    }

    /// The live registry, mutably.
    pub fn adapters_mut(&mut self) -> &mut Vec<SharedAdapter> {
        self.registry.as_mut_vec()
    }

    /// Copy of the current adapter handles, unaffected by later changes.
    pub fn snapshot(&self) -> Vec<SharedAdapter> {
        self.registry.snapshot()
    }

    /// Replaces the whole registry with `adapters`.
    pub fn set_adapters(&mut self, adapters: impl IntoIterator<Item = SharedAdapter>) {
        self.registry.replace_all(adapters);
    }

    /// Writes one adapter at `index`: replace below the length, append at the
    /// length, reject beyond it.
    pub fn set_adapter(&mut self, adapter: SharedAdapter, index: usize) -> Result<()> {
        self.registry.set(adapter, index)
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn layer_descriptions(&self) -> Vec<LayerInfo> {
        self.registry.describe()
    }

    pub fn stats(&self) -> TowerStats {
        self.stats.snapshot(self.registry.len())
    }

    // == Cascading Get ==
    /// Walks layers from 0 until one holds `key`, then copies the value into
    /// every faster layer.
    ///
    /// A layer that errors counts as a miss for that layer. Promotion writes
    /// pass no TTL so each layer applies its own.
    pub async fn lookup(&self, key: &str) -> Lookup {
        let mut lookup = Lookup::default();

        for (index, adapter) in self.registry.iter().enumerate() {
            match adapter.get(key).await {
                Ok(Some(value)) => {
                    debug!(key, layer = index, "cache hit");
                    lookup.value = Some(value);
                    lookup.layer = Some(index);
                    break;
                }
                Ok(None) => {}
                Err(error) => {
                    warn!(key, layer = index, %error, "layer read failed, treating as miss");
                    lookup.failures.push(LayerFailure { layer: index, error });
                }
            }
        }

        match (&lookup.value, lookup.layer) {
            (Some(value), Some(found_at)) => {
                self.stats.record_hit(found_at);
                let promoted = self.promote(key, value, found_at, &mut lookup.failures).await;
                self.stats.record_promotions(promoted);
            }
            _ => {
                debug!(key, "cache miss");
                self.stats.record_miss();
            }
        }

        self.stats.record_failures(lookup.failures.len());
        lookup
    }

    /// Writes `value` into layers `0..found_at`, returning how many succeeded.
    async fn promote(
        &self,
        key: &str,
        value: &str,
        found_at: usize,
        failures: &mut Vec<LayerFailure>,
    ) -> u64 {
        let mut promoted = 0;
        for (index, adapter) in self.registry.iter().take(found_at).enumerate() {
            match adapter.set(key, value, None).await {
                Ok(()) => promoted += 1,
                Err(error) => {
                    warn!(key, layer = index, %error, "promotion failed");
                    failures.push(LayerFailure { layer: index, error });
                }
            }
        }
        if promoted > 0 {
            debug!(key, from = found_at, promoted, "value promoted");
        }
        promoted
    }

    /// Cascading read returning only the value.
    pub async fn get(&self, key: &str) -> Option<String> {
        self.lookup(key).await.value
    }

    /// True if any layer reports holding `key`. Layers that error are skipped.
    pub async fn has(&self, key: &str) -> bool {
        for (index, adapter) in self.registry.iter().enumerate() {
            match adapter.has(key).await {
                Ok(true) => return true,
                Ok(false) => {}
                Err(error) => {
                    warn!(key, layer = index, %error, "layer existence check failed");
                    self.stats.record_failures(1);
                }
            }
        }
        false
    }

    // == Write-Through Set ==
    /// Writes `key` to every layer in order.
    ///
    /// Every layer is attempted; failures are reported together afterwards
    /// and successful writes are kept.
    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut failures = Vec::new();
        for (index, adapter) in self.registry.iter().enumerate() {
            if let Err(error) = adapter.set(key, value, None).await {
                warn!(key, layer = index, %error, "layer write failed");
                failures.push(LayerFailure { layer: index, error });
            }
        }
        self.finish("set", failures)
    }

    // == Cascading Delete ==
    /// Removes `key` from every layer. Absent keys are not an error.
    pub async fn delete(&self, key: &str) -> Result<()> {
        let mut failures = Vec::new();
        for (index, adapter) in self.registry.iter().enumerate() {
            if let Err(error) = adapter.delete(key).await {
                warn!(key, layer = index, %error, "layer delete failed");
                failures.push(LayerFailure { layer: index, error });
            }
        }
        self.finish("delete", failures)
    }

    // == Clear ==
    /// Clears every layer in order.
    pub async fn clear(&self) -> Result<()> {
        let mut failures = Vec::new();
        for (index, adapter) in self.registry.iter().enumerate() {
            if let Err(error) = adapter.clear().await {
                warn!(layer = index, %error, "layer clear failed");
                failures.push(LayerFailure { layer: index, error });
            }
        }
        self.finish("clear", failures)
    }

    /// Drops expired entries from every layer that tracks expiry itself.
    pub async fn purge_expired(&self) -> usize {
        let mut removed = 0;
        for adapter in self.registry.iter() {
            removed += adapter.purge_expired().await;
        }
        removed
    }

    fn finish(&self, operation: &'static str, failures: Vec<LayerFailure>) -> Result<()> {
        self.stats.record_failures(failures.len());
        CacheError::from_failures(operation, failures)
    }
}
