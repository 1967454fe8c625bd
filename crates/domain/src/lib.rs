//! dns-noise domain layer
pub mod activity;
pub mod config;
pub mod errors;
pub mod query_outcome;
pub mod record_type;
pub mod resolver_endpoint;
pub mod validators;

pub use activity::ActivitySample;
pub use config::{CliOverrides, Config, ConfigError};
pub use errors::DomainError;
pub use query_outcome::{AnswerRecord, DnsAnswer, OutboundQuery, QueryOutcome, Rcode};
pub use record_type::RecordType;
pub use resolver_endpoint::{ResolverEndpoint, ResolverSet, DEFAULT_DNS_PORT};
