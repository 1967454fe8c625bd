use super::{io_error, timeout_error, DnsTransport, TransportResponse};
use async_trait::async_trait;
use dns_noise_domain::DomainError;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::{debug, warn};

/// Maximum UDP DNS response size with EDNS(0)
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

/// DNS over UDP, one ephemeral socket per query.
pub struct UdpTransport {
    server_addr: SocketAddr,
}

impl UdpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    pub fn server_addr(&self) -> SocketAddr {
        self.server_addr
    }

    fn bind_addr(&self) -> SocketAddr {
        if self.server_addr.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        }
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        let server = self.server_addr;

        let exchange = async {
            let socket = UdpSocket::bind(self.bind_addr())
                .await
                .map_err(|e| io_error(server, "bind UDP socket for", e))?;

            let bytes_sent = socket
                .send_to(message_bytes, server)
                .await
                .map_err(|e| io_error(server, "send UDP query to", e))?;

            debug!(server = %server, bytes_sent, "UDP query sent");

            let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
            let (bytes_received, from_addr) = socket
                .recv_from(&mut recv_buf)
                .await
                .map_err(|e| io_error(server, "receive UDP response from", e))?;

            recv_buf.truncate(bytes_received);
            Ok::<_, DomainError>((recv_buf, from_addr))
        };

        // One deadline covers bind, send and receive together.
        let (recv_buf, from_addr) = tokio::time::timeout(timeout, exchange)
            .await
            .map_err(|_| timeout_error(server))??;

        if from_addr.ip() != server.ip() {
            warn!(
                expected = %server,
                received_from = %from_addr,
                "UDP response from unexpected source"
            );
        }

        debug!(server = %server, bytes_received = recv_buf.len(), "UDP response received");

        Ok(TransportResponse {
            bytes: recv_buf,
            protocol_used: "UDP",
        })
    }

    fn protocol_name(&self) -> &'static str {
        "UDP"
    }
}
