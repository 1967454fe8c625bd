use super::record_type_map::RecordTypeMapper;
use dns_noise_domain::{DnsAnswer, DomainError, Rcode};
use hickory_proto::op::{Message, MessageType};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct DnsResponse {
    pub id: u16,
    pub truncated: bool,
    pub answer: DnsAnswer,
}

impl DnsResponse {
    pub fn is_nodata(&self) -> bool {
        self.answer.rcode.is_success() && self.answer.records.is_empty()
    }
}

pub struct ResponseParser;

impl ResponseParser {
    /// Parses a response and checks it belongs to query `expected_id`.
    ///
    /// Any decoding problem is reported as `InvalidDnsResponse`, which the
    /// dispatcher treats as a transport failure.
    pub fn parse(response_bytes: &[u8], expected_id: u16) -> Result<DnsResponse, DomainError> {
        let message = Message::from_vec(response_bytes).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to parse DNS response: {}", e))
        })?;

        if message.message_type() != MessageType::Response {
            return Err(DomainError::InvalidDnsResponse(
                "Received a query instead of a response".into(),
            ));
        }

        if message.id() != expected_id {
            return Err(DomainError::InvalidDnsResponse(format!(
                "Response ID {} does not match query ID {}",
                message.id(),
                expected_id
            )));
        }

        let rcode = Rcode(u16::from(message.response_code()));
        let truncated = message.truncated();

        let records = message
            .answers()
            .iter()
            .map(RecordTypeMapper::to_answer)
            .collect::<Vec<_>>();

        debug!(
            rcode = %rcode,
            answers = records.len(),
            truncated,
            "DNS response parsed"
        );

        Ok(DnsResponse {
            id: message.id(),
            truncated,
            answer: DnsAnswer::new(rcode, records),
        })
    }
}
