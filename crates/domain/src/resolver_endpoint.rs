use crate::DomainError;
use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;

pub const DEFAULT_DNS_PORT: u16 = 53;

/// An upstream DNS server the noise queries are sent to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolverEndpoint {
    ip: IpAddr,
    port: u16,
    zone: Option<Arc<str>>,
    display: Arc<str>,
}

impl ResolverEndpoint {
    /// Builds an endpoint from a configured address string.
    ///
    /// A port of 0 means the standard DNS port. IPv6 addresses may carry
    /// their own zone (`fe80::1%eth1`); an embedded zone takes precedence
    /// over `zone`. IPv4 addresses never carry a zone.
    pub fn parse(address: &str, port: u16, zone: Option<&str>) -> Result<Self, DomainError> {
        let address = address.trim();
        let (ip_part, embedded_zone) = match address.split_once('%') {
            Some((ip, z)) => (ip, Some(z)),
            None => (address, None),
        };

        let ip: IpAddr = ip_part
            .parse()
            .map_err(|_| DomainError::InvalidIpAddress(address.to_string()))?;
        let ip = ip.to_canonical();

        let zone = match ip {
            IpAddr::V4(_) => None,
            IpAddr::V6(_) => embedded_zone
                .or(zone)
                .map(str::trim)
                .filter(|z| !z.is_empty())
                .map(Arc::from),
        };

        let port = if port == 0 { DEFAULT_DNS_PORT } else { port };

        Ok(Self::from_parts(ip, port, zone))
    }

    pub fn new(ip: IpAddr, port: u16) -> Self {
        Self::from_parts(ip, port, None)
    }

    fn from_parts(ip: IpAddr, port: u16, zone: Option<Arc<str>>) -> Self {
        let display: Arc<str> = match (&ip, &zone) {
            (IpAddr::V4(v4), _) => Arc::from(format!("{}:{}", v4, port)),
            (IpAddr::V6(v6), Some(z)) => Arc::from(format!("[{}%{}]:{}", v6, z, port)),
            (IpAddr::V6(v6), None) => Arc::from(format!("[{}]:{}", v6, port)),
        };

        Self {
            ip,
            port,
            zone,
            display,
        }
    }

    pub fn ip(&self) -> IpAddr {
        self.ip
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn zone(&self) -> Option<&str> {
        self.zone.as_deref()
    }

    /// Rendered `host:port` form, shared for logging and metric labels.
    pub fn display_arc(&self) -> Arc<str> {
        Arc::clone(&self.display)
    }
}

impl fmt::Display for ResolverEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

/// Ordered, non-empty list of resolvers. Position is priority.
#[derive(Debug, Clone)]
pub struct ResolverSet {
    endpoints: Vec<ResolverEndpoint>,
}

impl ResolverSet {
    pub fn new(endpoints: Vec<ResolverEndpoint>) -> Result<Self, DomainError> {
        if endpoints.is_empty() {
            return Err(DomainError::NoValidResolvers);
        }
        Ok(Self { endpoints })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResolverEndpoint> {
        self.endpoints.iter()
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn primary(&self) -> &ResolverEndpoint {
        &self.endpoints[0]
    }
}

impl<'a> IntoIterator for &'a ResolverSet {
    type Item = &'a ResolverEndpoint;
    type IntoIter = std::slice::Iter<'a, ResolverEndpoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.endpoints.iter()
    }
}
