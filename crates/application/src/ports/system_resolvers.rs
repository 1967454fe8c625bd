use dns_noise_domain::DomainError;

/// Host default resolver configuration (e.g. `/etc/resolv.conf`).
pub trait SystemResolverConfig: Send + Sync {
    /// Nameserver address strings in file order.
    fn nameservers(&self) -> Result<Vec<String>, DomainError>;

    /// Where the list came from, for log lines.
    fn origin(&self) -> &str;
}
