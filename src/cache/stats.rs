//! Tower Statistics Module
//!
//! Tracks hits, misses, promotions and layer failures across cascading operations.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use serde::Serialize;

// == Tower Stats ==
/// Point-in-time view of the tower's counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TowerStats {
    /// Lookups answered by some layer
    pub hits: u64,
    /// Lookups no layer could answer
    pub misses: u64,
    /// Values copied into a faster layer after a slower-layer hit
    pub promotions: u64,
    /// Individual adapter operations that returned an error
    pub layer_failures: u64,
    /// Hits by registry position
    pub hits_per_layer: Vec<u64>,
    /// Current registry length
    pub layers: usize,
}

impl TowerStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Stats Recorder ==
/// Shared counters updated from `&self` tower operations.
#[derive(Debug, Default)]
pub(crate) struct StatsRecorder {
    hits: AtomicU64,
    misses: AtomicU64,
    promotions: AtomicU64,
    layer_failures: AtomicU64,
    hits_per_layer: Mutex<Vec<u64>>,
}

impl StatsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a hit answered by the layer at `layer`.
    pub fn record_hit(&self, layer: usize) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        let mut per_layer = self
            .hits_per_layer
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if per_layer.len() <= layer {
            per_layer.resize(layer + 1, 0);
        }
        per_layer[layer] += 1;
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_promotions(&self, count: u64) {
        self.promotions.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_failures(&self, count: usize) {
        self.layer_failures.fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Copies the counters, sizing the per-layer vector to `layers`.
    pub fn snapshot(&self, layers: usize) -> TowerStats {
        let mut hits_per_layer = self
            .hits_per_layer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        hits_per_layer.resize(layers, 0);

        TowerStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            promotions: self.promotions.load(Ordering::Relaxed),
            layer_failures: self.layer_failures.load(Ordering::Relaxed),
            hits_per_layer,
            layers,
        }
    }
}
