use crate::{DomainError, RecordType};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

/// DNS response code as carried in the message header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rcode(pub u16);

impl Rcode {
    pub const NOERROR: Rcode = Rcode(0);
    pub const FORMERR: Rcode = Rcode(1);
    pub const SERVFAIL: Rcode = Rcode(2);
    pub const NXDOMAIN: Rcode = Rcode(3);
    pub const NOTIMP: Rcode = Rcode(4);
    pub const REFUSED: Rcode = Rcode(5);

    pub fn is_success(&self) -> bool {
        *self == Rcode::NOERROR
    }

    pub fn as_str(&self) -> &'static str {
        match self.0 {
            0 => "NOERROR",
            1 => "FORMERR",
            2 => "SERVFAIL",
            3 => "NXDOMAIN",
            4 => "NOTIMP",
            5 => "REFUSED",
            6 => "YXDOMAIN",
            7 => "YXRRSET",
            8 => "NXRRSET",
            9 => "NOTAUTH",
            10 => "NOTZONE",
            _ => "UNKNOWN",
        }
    }
}

impl fmt::Display for Rcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single answer-section record, classified by kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerRecord {
    A(Ipv4Addr),
    AAAA(Ipv6Addr),
    CNAME(String),
    MX { preference: u16, exchange: String },
    /// Any record kind outside the supported set, by wire type value.
    Unsupported(u16),
}

impl AnswerRecord {
    pub fn record_type(&self) -> Option<RecordType> {
        match self {
            AnswerRecord::A(_) => Some(RecordType::A),
            AnswerRecord::AAAA(_) => Some(RecordType::AAAA),
            AnswerRecord::CNAME(_) => Some(RecordType::CNAME),
            AnswerRecord::MX { .. } => Some(RecordType::MX),
            AnswerRecord::Unsupported(_) => None,
        }
    }

    /// Label used for metrics; unsupported kinds render as `TYPE<n>`.
    pub fn type_label(&self) -> String {
        match self {
            AnswerRecord::Unsupported(code) => format!("TYPE{}", code),
            other => other
                .record_type()
                .map(|rt| rt.as_str().to_string())
                .unwrap_or_default(),
        }
    }
}

impl fmt::Display for AnswerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerRecord::A(ip) => write!(f, "{}", ip),
            AnswerRecord::AAAA(ip) => write!(f, "{}", ip),
            AnswerRecord::CNAME(target) => f.write_str(target),
            AnswerRecord::MX {
                preference,
                exchange,
            } => write!(f, "{} {}", preference, exchange),
            AnswerRecord::Unsupported(code) => write!(f, "TYPE{}", code),
        }
    }
}

/// A query encoded once and sent unchanged to each resolver tried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundQuery {
    pub domain: String,
    pub record_type: RecordType,
    pub id: u16,
    pub wire: Vec<u8>,
}

impl OutboundQuery {
    pub fn new(domain: impl Into<String>, record_type: RecordType, id: u16, wire: Vec<u8>) -> Self {
        Self {
            domain: domain.into(),
            record_type,
            id,
            wire,
        }
    }
}

/// What came back from one completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsAnswer {
    pub rcode: Rcode,
    pub records: Vec<AnswerRecord>,
}

impl DnsAnswer {
    pub fn new(rcode: Rcode, records: Vec<AnswerRecord>) -> Self {
        Self { rcode, records }
    }
}

/// Result of one lookup across the resolver set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// No resolver completed an exchange, or the query could not be encoded.
    TransportFailure(DomainError),
    /// A resolver answered with a non-success response code.
    ServerError { rcode: Rcode, server: Arc<str> },
    /// A resolver answered with NOERROR. `records` may be empty.
    Answered {
        records: Vec<AnswerRecord>,
        rcode: Rcode,
        server: Arc<str>,
    },
}

impl QueryOutcome {
    pub fn server(&self) -> Option<&str> {
        match self {
            QueryOutcome::TransportFailure(_) => None,
            QueryOutcome::ServerError { server, .. } | QueryOutcome::Answered { server, .. } => {
                Some(server)
            }
        }
    }

    pub fn rcode(&self) -> Option<Rcode> {
        match self {
            QueryOutcome::TransportFailure(_) => None,
            QueryOutcome::ServerError { rcode, .. } | QueryOutcome::Answered { rcode, .. } => {
                Some(*rcode)
            }
        }
    }

    pub fn is_transport_failure(&self) -> bool {
        matches!(self, QueryOutcome::TransportFailure(_))
    }
}
