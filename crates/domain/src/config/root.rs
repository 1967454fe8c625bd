use super::{
    ConfigError, DatabaseConfig, LoggingConfig, MetricsConfig, NameServerConfig, NoiseConfig,
    PiholeConfig, SourceConfig,
};
use crate::validators::{validate_source_label, validate_source_url};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

const DEFAULT_CONFIG_PATH: &str = "dns-noise.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub noise: NoiseConfig,

    #[serde(default)]
    pub nameservers: Vec<NameServerConfig>,

    #[serde(default)]
    pub pihole: PiholeConfig,

    #[serde(default)]
    pub sources: Vec<SourceConfig>,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub metrics: MetricsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Values passed on the command line; each one replaces the file value.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub database_path: Option<String>,
    pub min_period_ms: Option<u64>,
    pub max_period_ms: Option<u64>,
}

impl Config {
    /// Loads the configuration file and applies CLI overrides.
    ///
    /// An explicit path must exist. Without one, `dns-noise.toml` in the
    /// working directory is used if present, defaults otherwise.
    pub fn load(path: Option<&str>, overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(DEFAULT_CONFIG_PATH)?
            }
            None => Self::default(),
        };

        config.apply_overrides(overrides);
        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn apply_overrides(&mut self, overrides: CliOverrides) {
        if let Some(path) = overrides.database_path {
            self.database.path = path;
        }
        if let Some(min) = overrides.min_period_ms {
            self.noise.min_period_ms = min;
        }
        if let Some(max) = overrides.max_period_ms {
            self.noise.max_period_ms = max;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.noise.min_period_ms > self.noise.max_period_ms {
            return Err(ConfigError::InvalidPacingBounds {
                min_ms: self.noise.min_period_ms,
                max_ms: self.noise.max_period_ms,
            });
        }

        if !self.noise.ipv4 && !self.noise.ipv6 {
            return Err(ConfigError::Invalid(
                "At least one of noise.ipv4 / noise.ipv6 must be enabled".into(),
            ));
        }

        if self.noise.query_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "noise.query_timeout_ms must be positive".into(),
            ));
        }

        if self.pihole.is_enabled() && self.pihole.activity_period_secs == 0 {
            return Err(ConfigError::Invalid(
                "pihole.activity_period_secs must be positive".into(),
            ));
        }

        let mut labels = HashSet::new();
        for source in &self.sources {
            validate_source_label(&source.label).map_err(ConfigError::InvalidSource)?;
            validate_source_url(&source.url)
                .map_err(|e| ConfigError::InvalidSource(format!("{}: {}", source.label, e)))?;
            if !labels.insert(source.label.as_str()) {
                return Err(ConfigError::InvalidSource(format!(
                    "Duplicate source label '{}'",
                    source.label
                )));
            }
        }

        Ok(())
    }
}
