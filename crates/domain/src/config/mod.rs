//! Configuration module for dns-noise
//!
//! Structures are grouped by concern:
//! - `root`: main configuration, loading and CLI overrides
//! - `noise`: pacing bounds and which address families to query
//! - `nameserver`: explicitly configured upstream resolvers
//! - `pihole`: activity monitor used for feedback pacing
//! - `source`: domain corpus sources
//! - `database`: corpus database location
//! - `metrics`: optional metrics listener
//! - `logging`: logging settings
//! - `errors`: configuration errors

pub mod database;
pub mod errors;
pub mod logging;
pub mod metrics;
pub mod nameserver;
pub mod noise;
pub mod pihole;
pub mod root;
pub mod source;

pub use database::DatabaseConfig;
pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use metrics::MetricsConfig;
pub use nameserver::NameServerConfig;
pub use noise::NoiseConfig;
pub use pihole::PiholeConfig;
pub use root::{CliOverrides, Config};
pub use source::SourceConfig;
