use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {reason}")]
    FileRead { path: String, reason: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Minimum period ({min_ms}ms) exceeds maximum period ({max_ms}ms)")]
    InvalidPacingBounds { min_ms: u64, max_ms: u64 },

    #[error("Invalid source configuration: {0}")]
    InvalidSource(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
