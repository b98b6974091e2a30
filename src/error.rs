//! Error types for the cache tower
//!
//! Adapter-level failures stay local to one layer; tower-level errors cover
//! construction, registry structure and aggregated layer failures.

use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Adapter Error ==
/// Failure raised by a single adapter's backing store.
#[derive(Error, Debug)]
pub enum AdapterError {
    /// Redis command or connection failure
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Adapter-specific parameters could not be interpreted
    #[error("invalid adapter parameters: {0}")]
    InvalidParams(String),
}

/// Result type returned by adapter operations.
pub type AdapterResult<T> = std::result::Result<T, AdapterError>;

// == Layer Failure ==
/// One layer's failure during a cascading operation.
#[derive(Debug)]
pub struct LayerFailure {
    /// Registry position of the failing layer
    pub layer: usize,
    /// What the adapter reported
    pub error: AdapterError,
}

impl fmt::Display for LayerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer {}: {}", self.layer, self.error)
    }
}

fn join_failures(failures: &[LayerFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// == Cache Error Enum ==
/// Unified error type for the cache tower.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Layer configuration names an adapter kind nobody registered
    #[error("Unsupported adapter: {0}")]
    UnsupportedAdapter(String),

    /// Layer declaration is malformed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Tower constructed without any layer declaration
    #[error("Missing layer declaration: pass an empty list for a tower without layers")]
    MissingLayers,

    /// `set_adapter` index would leave a gap in the registry
    #[error("Layer index {index} out of range for registry of length {len}")]
    LayerIndexOutOfRange { index: usize, len: usize },

    /// One or more layers failed during a sweep over all layers
    #[error(
        "{operation} failed on {} layer(s): {}",
        .failures.len(),
        join_failures(.failures)
    )]
    LayerFailures {
        operation: &'static str,
        failures: Vec<LayerFailure>,
    },

    /// Key not found in any layer
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl CacheError {
    /// Wraps collected layer failures, or returns `Ok` when there were none.
    pub fn from_failures(operation: &'static str, failures: Vec<LayerFailure>) -> Result<()> {
        if failures.is_empty() {
            Ok(())
        } else {
            Err(CacheError::LayerFailures {
                operation,
                failures,
            })
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) | CacheError::LayerIndexOutOfRange { .. } => {
                StatusCode::BAD_REQUEST
            }
            CacheError::LayerFailures { .. } => StatusCode::BAD_GATEWAY,
            CacheError::UnsupportedAdapter(_)
            | CacheError::InvalidConfig(_)
            | CacheError::MissingLayers => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache tower.
pub type Result<T> = std::result::Result<T, CacheError>;
