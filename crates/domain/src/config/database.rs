use serde::{Deserialize, Serialize};

/// Database holding the domain corpus
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Path to SQLite database file (default: "/tmp/dns-noise.db")
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl DatabaseConfig {
    pub fn url(&self) -> String {
        format!("sqlite://{}", self.path)
    }
}

fn default_db_path() -> String {
    "/tmp/dns-noise.db".to_string()
}
