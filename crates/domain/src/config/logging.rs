use serde::{Deserialize, Serialize};

/// `[logging]` section. `RUST_LOG` overrides `level` when set.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// One of "trace", "debug", "info", "warn", "error" (default: "info")
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit one JSON object per line instead of human-readable text
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
