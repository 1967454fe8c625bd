use serde::{Deserialize, Serialize};

/// Explicitly configured upstream resolver
///
/// ```toml
/// [[nameservers]]
/// ip = "fe80::1"
/// zone = "eth0"
/// port = 53
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct NameServerConfig {
    pub ip: String,

    /// 0 or absent means the standard DNS port
    #[serde(default)]
    pub port: u16,

    /// IPv6 zone; ignored for IPv4 and when `ip` embeds its own zone
    #[serde(default)]
    pub zone: Option<String>,
}

impl NameServerConfig {
    pub fn new(ip: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            port: 0,
            zone: None,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }
}
