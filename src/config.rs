//! Configuration Module
//!
//! Handles loading server and layer configuration from environment variables.

use std::env;
use std::fs;

use serde_json::{json, Value};

use crate::error::{CacheError, Result};

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Background expiry sweep interval in seconds
    pub cleanup_interval: u64,
    /// JSON layer declaration handed to `CacheTower::from_declaration`
    pub layers: Value,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Expiry sweep frequency in seconds (default: 1)
    /// - `CACHE_LAYERS` - JSON list of layer configurations
    /// - `CACHE_LAYERS_FILE` - Path to a JSON file with the same content,
    ///   read when `CACHE_LAYERS` is unset (default: one memory layer)
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let layers = match (env::var("CACHE_LAYERS"), env::var("CACHE_LAYERS_FILE")) {
            (Ok(inline), _) => parse_layers(&inline, "CACHE_LAYERS")?,
            (Err(_), Ok(path)) => {
                let contents = fs::read_to_string(&path).map_err(|e| {
                    CacheError::InvalidConfig(format!("cannot read {}: {}", path, e))
                })?;
                parse_layers(&contents, &path)?
            }
            (Err(_), Err(_)) => defaults.layers,
        };

        Ok(Self {
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            cleanup_interval: env::var("CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cleanup_interval),
            layers,
        })
    }
}

fn parse_layers(raw: &str, source: &str) -> Result<Value> {
    serde_json::from_str(raw)
        .map_err(|e| CacheError::InvalidConfig(format!("{} is not valid JSON: {}", source, e)))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            cleanup_interval: 1,
            layers: json!([{ "adapter": "memory" }]),
        }
    }
}
