//! Cache configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a single analysis cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of entries kept
    /// Default: 10,000
    pub max_capacity: u64,

    /// Optional time-to-live for entries (in seconds)
    /// Default: none (size-bounded only)
    #[serde(default)]
    pub time_to_live_secs: Option<u64>,

    /// Disable to bypass the cache entirely (every lookup misses)
    /// Default: true
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
            time_to_live_secs: None,
            enabled: true,
        }
    }
}

impl CacheConfig {
    /// Small, short-lived cache for memory-constrained hosts
    pub fn compact() -> Self {
        Self {
            max_capacity: 1_000,
            time_to_live_secs: Some(600),
            enabled: true,
        }
    }

    /// Caching switched off
    pub fn disabled() -> Self {
        Self {
            max_capacity: 0,
            time_to_live_secs: None,
            enabled: false,
        }
    }

    /// Time-to-live as a Duration
    pub fn time_to_live(&self) -> Option<Duration> {
        self.time_to_live_secs.map(Duration::from_secs)
    }
}
