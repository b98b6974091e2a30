//! Expiry Sweep Task
//!
//! Background task that periodically drops expired entries from the tower's
//! in-process layers.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheTower;

/// Spawns a background task that periodically purges expired entries.
///
/// Only a read lock on the tower is taken: purging is a data operation and
/// each adapter synchronizes its own store.
///
/// # Arguments
/// * `tower` - shared tower
/// * `cleanup_interval_secs` - Interval in seconds between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, to be aborted during graceful shutdown.
///
/// # Example
/// ```ignore
/// let tower = Arc::new(RwLock::new(CacheTower::new()));
/// let cleanup_handle = spawn_cleanup_task(tower.clone(), 1);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(
    tower: Arc<RwLock<CacheTower>>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting expiry sweep task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = tower.read().await.purge_expired().await;

            if removed > 0 {
                info!("Expiry sweep: removed {} expired entries", removed);
            } else {
                debug!("Expiry sweep: no expired entries found");
            }
        }
    })
}
