use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Pacing bounds and query families for noise generation
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NoiseConfig {
    /// Shortest delay between two noise ticks in milliseconds (default: 100)
    #[serde(default = "default_min_period_ms")]
    pub min_period_ms: u64,

    /// Longest delay between two noise ticks in milliseconds (default: 10000)
    #[serde(default = "default_max_period_ms")]
    pub max_period_ms: u64,

    /// Issue A lookups (default: true)
    #[serde(default = "default_true")]
    pub ipv4: bool,

    /// Issue AAAA lookups (default: true)
    #[serde(default = "default_true")]
    pub ipv6: bool,

    /// Further record types queried after the address families, e.g. `["MX"]`.
    /// Unsupported names are queried as `A`.
    #[serde(default)]
    pub extra_types: Vec<String>,

    /// Per-exchange transport timeout in milliseconds (default: 2000)
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            min_period_ms: default_min_period_ms(),
            max_period_ms: default_max_period_ms(),
            ipv4: true,
            ipv6: true,
            extra_types: Vec::new(),
            query_timeout_ms: default_query_timeout_ms(),
        }
    }
}

impl NoiseConfig {
    pub fn min_period(&self) -> Duration {
        Duration::from_millis(self.min_period_ms)
    }

    pub fn max_period(&self) -> Duration {
        Duration::from_millis(self.max_period_ms)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}

fn default_min_period_ms() -> u64 {
    100
}

fn default_max_period_ms() -> u64 {
    10_000
}

fn default_query_timeout_ms() -> u64 {
    2000
}

fn default_true() -> bool {
    true
}
