use super::{io_error, timeout_error, DnsTransport, TransportResponse};
use async_trait::async_trait;
use dns_noise_domain::DomainError;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

/// DNS over TCP (RFC 1035 §4.2.2): every message carries a 2-byte length
/// prefix. Used for the retry after a truncated UDP answer.
pub struct TcpTransport {
    server_addr: SocketAddr,
}

impl TcpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    async fn exchange(&self, message_bytes: &[u8]) -> Result<Vec<u8>, DomainError> {
        let server = self.server_addr;
        let len = u16::try_from(message_bytes.len()).map_err(|_| {
            DomainError::InvalidDnsResponse(format!(
                "Query of {} bytes exceeds TCP frame size",
                message_bytes.len()
            ))
        })?;

        let mut stream = TcpStream::connect(server)
            .await
            .map_err(|e| io_error(server, "connect to", e))?;

        let mut frame = Vec::with_capacity(message_bytes.len() + 2);
        frame.extend_from_slice(&len.to_be_bytes());
        frame.extend_from_slice(message_bytes);

        stream
            .write_all(&frame)
            .await
            .map_err(|e| io_error(server, "send TCP query to", e))?;
        stream
            .flush()
            .await
            .map_err(|e| io_error(server, "send TCP query to", e))?;

        let mut len_bytes = [0u8; 2];
        stream
            .read_exact(&mut len_bytes)
            .await
            .map_err(|e| io_error(server, "read TCP response length from", e))?;

        let response_len = u16::from_be_bytes(len_bytes) as usize;
        let mut response = vec![0u8; response_len];
        stream
            .read_exact(&mut response)
            .await
            .map_err(|e| io_error(server, "read TCP response from", e))?;

        Ok(response)
    }
}

#[async_trait]
impl DnsTransport for TcpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        let bytes = tokio::time::timeout(timeout, self.exchange(message_bytes))
            .await
            .map_err(|_| timeout_error(self.server_addr))??;

        debug!(
            server = %self.server_addr,
            bytes_received = bytes.len(),
            "TCP response received"
        );

        Ok(TransportResponse {
            bytes,
            protocol_used: "TCP",
        })
    }

    fn protocol_name(&self) -> &'static str {
        "TCP"
    }
}
