use dns_noise_application::ports::SystemResolverConfig;
use dns_noise_domain::DomainError;
use tracing::debug;

const DEFAULT_RESOLV_CONF: &str = "/etc/resolv.conf";

/// Reads `nameserver` lines from a resolv.conf-style file.
pub struct ResolvConfReader {
    path: String,
}

impl ResolvConfReader {
    pub fn new() -> Self {
        Self {
            path: DEFAULT_RESOLV_CONF.to_string(),
        }
    }

    /// Custom path, for tests and non-standard hosts.
    pub fn with_path(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn parse(content: &str) -> Vec<String> {
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.starts_with('#') && !line.starts_with(';'))
            .filter_map(|line| {
                let mut fields = line.split_whitespace();
                match (fields.next(), fields.next()) {
                    (Some("nameserver"), Some(addr)) => Some(addr.to_string()),
                    _ => None,
                }
            })
            .collect()
    }
}

impl Default for ResolvConfReader {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemResolverConfig for ResolvConfReader {
    fn nameservers(&self) -> Result<Vec<String>, DomainError> {
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| DomainError::IoError(format!("Failed to read {}: {}", self.path, e)))?;

        let servers = Self::parse(&content);
        debug!(path = %self.path, count = servers.len(), "Parsed system nameservers");
        Ok(servers)
    }

    fn origin(&self) -> &str {
        &self.path
    }
}
