//! Cache Module
//!
//! The tier-orchestration engine: layer registry, cascading operations and
//! the counters they maintain.

mod registry;
mod stats;
mod tower;


// Re-export public types
pub use registry::{LayerInfo, LayerRegistry};
pub(crate) use stats::StatsRecorder;
pub use stats::TowerStats;
pub use self::tower::{CacheTower, Lookup};

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB
