use async_trait::async_trait;
use dns_noise_domain::{DnsAnswer, DomainError, OutboundQuery, RecordType, ResolverEndpoint};

/// One DNS request/response exchange with a single resolver.
///
/// Implementations bound the exchange with their own transport timeout.
/// `Ok` means a well-formed response arrived, whatever its response code;
/// every `Err` is a transport-level failure.
#[async_trait]
pub trait DnsExchange: Send + Sync {
    /// Encodes the query before any resolver is contacted. An error here
    /// means the name cannot be sent to any resolver.
    fn encode(&self, domain: &str, record_type: RecordType) -> Result<OutboundQuery, DomainError>;

    async fn exchange(
        &self,
        server: &ResolverEndpoint,
        query: &OutboundQuery,
    ) -> Result<DnsAnswer, DomainError>;
}
