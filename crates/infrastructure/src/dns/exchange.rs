use super::forwarding::{DnsResponse, MessageBuilder, ResponseParser};
use super::transport::Transport;
use crate::system::interface::zone_scope_id;
use async_trait::async_trait;
use dns_noise_application::ports::DnsExchange;
use dns_noise_domain::{DnsAnswer, DomainError, OutboundQuery, RecordType, ResolverEndpoint};
use std::net::{IpAddr, SocketAddr, SocketAddrV6};
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// Floor for the TCP retry when the UDP leg used up the whole budget.
const MIN_TCP_RETRY_BUDGET: Duration = Duration::from_millis(500);

/// Plain DNS exchange over UDP, retried over TCP when the answer comes back
/// truncated.
pub struct HickoryDnsExchange {
    timeout: Duration,
}

impl HickoryDnsExchange {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

/// Socket address for an endpoint, resolving the IPv6 zone to a scope id.
pub fn socket_addr(server: &ResolverEndpoint) -> SocketAddr {
    match server.ip() {
        IpAddr::V4(v4) => SocketAddr::from((v4, server.port())),
        IpAddr::V6(v6) => {
            let scope_id = match server.zone() {
                Some(zone) => zone_scope_id(zone).unwrap_or_else(|| {
                    warn!(zone, server = %server, "Unknown interface zone, sending unscoped");
                    0
                }),
                None => 0,
            };
            SocketAddr::V6(SocketAddrV6::new(v6, server.port(), 0, scope_id))
        }
    }
}

fn finish(response: DnsResponse) -> DnsAnswer {
    if response.is_nodata() {
        debug!("NOERROR with an empty answer section");
    }
    response.answer
}

#[async_trait]
impl DnsExchange for HickoryDnsExchange {
    fn encode(&self, domain: &str, record_type: RecordType) -> Result<OutboundQuery, DomainError> {
        let (id, wire) = MessageBuilder::build_query_with_id(domain, record_type)?;
        Ok(OutboundQuery::new(domain, record_type, id, wire))
    }

    #[instrument(skip(self, server, query), fields(server = %server, domain = %query.domain))]
    async fn exchange(
        &self,
        server: &ResolverEndpoint,
        query: &OutboundQuery,
    ) -> Result<DnsAnswer, DomainError> {
        let start = Instant::now();
        let addr = socket_addr(server);

        let udp_response = Transport::udp(addr).send(&query.wire, self.timeout).await?;
        let response = ResponseParser::parse(&udp_response.bytes, query.id)?;

        if !response.truncated {
            return Ok(finish(response));
        }

        let remaining = self
            .timeout
            .saturating_sub(start.elapsed())
            .max(MIN_TCP_RETRY_BUDGET);

        let transport = Transport::tcp(addr);
        debug!(
            protocol = transport.protocol_name(),
            budget_ms = remaining.as_millis() as u64,
            "Retrying truncated answer"
        );
        let tcp_response = transport.send(&query.wire, remaining).await?;
        let response = ResponseParser::parse(&tcp_response.bytes, query.id)?;

        Ok(finish(response))
    }
}
