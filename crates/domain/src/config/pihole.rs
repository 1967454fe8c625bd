use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Pi-hole used as the activity monitor for feedback pacing
///
/// Feedback pacing is only used when `host`, `auth_token` and a positive
/// `noise_percentage` are all present.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PiholeConfig {
    /// Host (and optional port) of the Pi-hole admin interface
    #[serde(default)]
    pub host: String,

    #[serde(default)]
    pub auth_token: String,

    /// Window of past activity to measure, in seconds (default: 300)
    #[serde(default = "default_activity_period_secs")]
    pub activity_period_secs: u64,

    /// How often the activity is re-measured, in seconds (default: 60)
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,

    /// Client-host prefix identifying this program's own queries.
    /// Empty counts every query as real traffic.
    #[serde(default)]
    pub filter: String,

    /// Target noise level relative to real traffic (default: 10)
    #[serde(default = "default_noise_percentage")]
    pub noise_percentage: u32,

    /// HTTP timeout for the activity request in milliseconds (default: 5000)
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for PiholeConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            auth_token: String::new(),
            activity_period_secs: default_activity_period_secs(),
            refresh_secs: default_refresh_secs(),
            filter: String::new(),
            noise_percentage: default_noise_percentage(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl PiholeConfig {
    pub fn is_enabled(&self) -> bool {
        !self.host.trim().is_empty() && !self.auth_token.is_empty() && self.noise_percentage > 0
    }

    pub fn activity_period(&self) -> Duration {
        Duration::from_secs(self.activity_period_secs)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

fn default_activity_period_secs() -> u64 {
    300
}

fn default_refresh_secs() -> u64 {
    60
}

fn default_noise_percentage() -> u32 {
    10
}

fn default_request_timeout_ms() -> u64 {
    5000
}
