use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid IP address: {0}")]
    InvalidIpAddress(String),

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("No valid resolvers configured")]
    NoValidResolvers,

    #[error("Timeout talking to {server}")]
    TransportTimeout { server: String },

    #[error("Connection refused by {server}")]
    TransportConnectionRefused { server: String },

    #[error("All {attempted} resolvers unreachable")]
    TransportAllServersUnreachable { attempted: usize },

    #[error("No activity observed on {host}")]
    NoActivitySignal { host: String },

    #[error("Activity monitor error: {0}")]
    ActivityFetch(String),

    #[error("Domain corpus is empty")]
    EmptyCorpus,

    #[error("Invalid domain source '{label}': {reason}")]
    InvalidSource { label: String, reason: String },

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("I/O error: {0}")]
    IoError(String),
}
