//! API Handlers
//!
//! HTTP request handlers for each cache tower endpoint.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::CacheTower;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    ClearResponse, DeleteResponse, GetResponse, HealthResponse, LayersResponse, SetRequest,
    SetResponse, StatsResponse,
};

/// Application state shared across all handlers.
///
/// Data operations take the read side of the lock; only restructuring the
/// registry would need the write side.
#[derive(Clone)]
pub struct AppState {
    /// Shared cache tower
    pub tower: Arc<RwLock<CacheTower>>,
}

impl AppState {
    /// Creates a new AppState around the given tower.
    pub fn new(tower: CacheTower) -> Self {
        Self {
            tower: Arc::new(RwLock::new(tower)),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Builds the tower from the configured layer declaration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let tower = CacheTower::from_declaration(Some(&config.layers))?;
        Ok(Self::new(tower))
    }
}

/// Handler for PUT /set
///
/// Writes the value through every layer.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let tower = state.tower.read().await;
    tower.set(&req.key, &req.value).await?;

    Ok(Json(SetResponse::new(req.key, tower.len())))
}

/// Handler for GET /get/:key
///
/// Cascading read; the value is promoted into faster layers on the way out.
/// Layers that failed along the way are listed in `failed_layers`.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    let tower = state.tower.read().await;
    let lookup = tower.lookup(&key).await;

    let failed_layers = lookup.failures.iter().map(|failure| failure.layer).collect();

    match (lookup.value, lookup.layer) {
        (Some(value), Some(layer)) => {
            Ok(Json(GetResponse::new(key, value, layer).with_failed_layers(failed_layers)))
        }
        _ => Err(CacheError::NotFound(key)),
    }
}

/// Handler for DELETE /del/:key
///
/// Removes the key from every layer; deleting an absent key succeeds.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let tower = state.tower.read().await;
    tower.delete(&key).await?;

    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for DELETE /clear
pub async fn clear_handler(State(state): State<AppState>) -> Result<Json<ClearResponse>> {
    let tower = state.tower.read().await;
    tower.clear().await?;

    Ok(Json(ClearResponse::new(tower.len())))
}

/// Handler for GET /layers
pub async fn layers_handler(State(state): State<AppState>) -> Json<LayersResponse> {
    let tower = state.tower.read().await;

    Json(LayersResponse {
        layers: tower.layer_descriptions(),
    })
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let tower = state.tower.read().await;

    Json(StatsResponse::from(tower.stats()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
