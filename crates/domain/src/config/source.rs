use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Remote CSV feeding the domain corpus
///
/// ```toml
/// [[sources]]
/// label = "umbrella"
/// url = "https://example.org/top-1m.csv"
/// column = 1
/// refresh_secs = 86400
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct SourceConfig {
    pub label: String,

    pub url: String,

    /// 0-based CSV column holding the domain (default: 1, `rank,domain`)
    #[serde(default = "default_column")]
    pub column: usize,

    /// Reload interval in seconds; 0 disables periodic refresh (default: 86400)
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,
}

impl SourceConfig {
    pub fn refresh_interval(&self) -> Option<Duration> {
        if self.refresh_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.refresh_secs))
        }
    }
}

fn default_column() -> usize {
    1
}

fn default_refresh_secs() -> u64 {
    86_400
}
