//! Response DTOs for the cache tower API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{LayerInfo, TowerStats};

/// Response body for the GET operation (GET /get/:key)
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The stored value
    pub value: String,
    /// Position of the layer that answered
    pub layer: usize,
    /// Layers that failed during the read or the promotion
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_layers: Vec<usize>,
}

impl GetResponse {
    /// Creates a new GetResponse
    pub fn new(key: impl Into<String>, value: impl Into<String>, layer: usize) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            layer,
            failed_layers: Vec::new(),
        }
    }

    /// Records the layers that failed; duplicates are collapsed.
    pub fn with_failed_layers(mut self, mut layers: Vec<usize>) -> Self {
        layers.sort_unstable();
        layers.dedup();
        self.failed_layers = layers;
        self
    }
}

/// Response body for the SET operation (PUT /set)
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    /// The key that was set
    pub key: String,
    /// Number of layers written
    pub layers: usize,
}

impl SetResponse {
    /// Creates a new SetResponse
    pub fn new(key: impl Into<String>, layers: usize) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' written to {} layer(s)", key, layers),
            key,
            layers,
        }
    }
}

/// Response body for the DELETE operation (DELETE /del/:key)
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The key that was deleted
    pub key: String,
}

impl DeleteResponse {
    /// Creates a new DeleteResponse
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted from all layers", key),
            key,
        }
    }
}

/// Response body for DELETE /clear
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
    /// Number of layers cleared
    pub layers: usize,
}

impl ClearResponse {
    pub fn new(layers: usize) -> Self {
        Self {
            message: format!("Cleared {} layer(s)", layers),
            layers,
        }
    }
}

/// Response body for GET /layers
#[derive(Debug, Clone, Serialize)]
pub struct LayersResponse {
    pub layers: Vec<LayerInfo>,
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of lookups answered by some layer
    pub hits: u64,
    /// Number of lookups no layer answered
    pub misses: u64,
    /// Number of promotions into faster layers
    pub promotions: u64,
    /// Number of failed adapter operations
    pub layer_failures: u64,
    /// Hits by layer position
    pub hits_per_layer: Vec<u64>,
    /// Number of layers
    pub layers: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<TowerStats> for StatsResponse {
    fn from(stats: TowerStats) -> Self {
        let hit_rate = stats.hit_rate();
        Self {
            hits: stats.hits,
            misses: stats.misses,
            promotions: stats.promotions,
            layer_failures: stats.layer_failures,
            hits_per_layer: stats.hits_per_layer,
            layers: stats.layers,
            hit_rate,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
