use crate::ports::SystemResolverConfig;
use dns_noise_domain::config::NameServerConfig;
use dns_noise_domain::{DomainError, ResolverEndpoint, ResolverSet, DEFAULT_DNS_PORT};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Builds the resolver set once at startup.
///
/// Explicit nameservers win; when none of them is usable the host's default
/// resolvers are used instead. Having neither is fatal.
pub struct BuildResolverSetUseCase {
    system: Arc<dyn SystemResolverConfig>,
}

impl BuildResolverSetUseCase {
    pub fn new(system: Arc<dyn SystemResolverConfig>) -> Self {
        Self { system }
    }

    pub fn execute(&self, configured: &[NameServerConfig]) -> Result<ResolverSet, DomainError> {
        let explicit = Self::parse_configured(configured);
        if !explicit.is_empty() {
            return ResolverSet::new(explicit);
        }

        if configured.is_empty() {
            info!("No nameservers configured, using system defaults");
        } else {
            warn!("No valid nameserver in configuration, using system defaults");
        }

        let defaults = self.system_defaults();
        if defaults.is_empty() {
            error!(
                origin = self.system.origin(),
                "Unable to establish DNS server configuration"
            );
        }
        ResolverSet::new(defaults)
    }

    fn parse_configured(configured: &[NameServerConfig]) -> Vec<ResolverEndpoint> {
        configured
            .iter()
            .filter_map(|ns| {
                match ResolverEndpoint::parse(&ns.ip, ns.port, ns.zone.as_deref()) {
                    Ok(endpoint) => {
                        info!(server = %endpoint, "Configured nameserver");
                        Some(endpoint)
                    }
                    Err(e) => {
                        warn!(ip = %ns.ip, error = %e, "Skipping unrecognized nameserver address");
                        None
                    }
                }
            })
            .collect()
    }

    fn system_defaults(&self) -> Vec<ResolverEndpoint> {
        let addresses = match self.system.nameservers() {
            Ok(addresses) => addresses,
            Err(e) => {
                warn!(origin = self.system.origin(), error = %e, "Failed to read system resolvers");
                return Vec::new();
            }
        };

        addresses
            .iter()
            .filter_map(
                |address| match ResolverEndpoint::parse(address, DEFAULT_DNS_PORT, None) {
                    Ok(endpoint) => {
                        info!(server = %endpoint, origin = self.system.origin(), "System nameserver");
                        Some(endpoint)
                    }
                    Err(e) => {
                        warn!(address = %address, error = %e, "Skipping unrecognized system nameserver");
                        None
                    }
                },
            )
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticSystem(Result<Vec<String>, DomainError>);

    impl SystemResolverConfig for StaticSystem {
        fn nameservers(&self) -> Result<Vec<String>, DomainError> {
            self.0.clone()
        }

        fn origin(&self) -> &str {
            "test"
        }
    }

    fn use_case(system: Result<Vec<&str>, DomainError>) -> BuildResolverSetUseCase {
        let system = system.map(|v| v.into_iter().map(String::from).collect());
        BuildResolverSetUseCase::new(Arc::new(StaticSystem(system)))
    }

    fn rendered(set: &ResolverSet) -> Vec<String> {
        set.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn test_single_ipv4_without_port() {
        let set = use_case(Ok(vec![]))
            .execute(&[NameServerConfig::new("127.0.0.1")])
            .unwrap();
        assert_eq!(rendered(&set), vec!["127.0.0.1:53"]);
    }

    #[test]
    fn test_ipv6_with_zone() {
        let set = use_case(Ok(vec![]))
            .execute(&[NameServerConfig::new("::1").with_zone("eth0")])
            .unwrap();
        assert_eq!(rendered(&set), vec!["[::1%eth0]:53"]);
    }

    #[test]
    fn test_embedded_zone_wins() {
        let set = use_case(Ok(vec![]))
            .execute(&[NameServerConfig::new("fe80::1%eth1").with_zone("eth0")])
            .unwrap();
        assert_eq!(rendered(&set), vec!["[fe80::1%eth1]:53"]);
    }

    #[test]
    fn test_invalid_entries_are_skipped_in_order() {
        let set = use_case(Ok(vec!["8.8.8.8"]))
            .execute(&[
                NameServerConfig::new("9.9.9.9").with_port(5353),
                NameServerConfig::new("not-an-ip"),
                NameServerConfig::new("1.1.1.1"),
            ])
            .unwrap();
        assert_eq!(rendered(&set), vec!["9.9.9.9:5353", "1.1.1.1:53"]);
    }

    #[test]
    fn test_empty_config_uses_system_defaults() {
        let set = use_case(Ok(vec!["192.168.1.1", "fe80::1%eth0"]))
            .execute(&[])
            .unwrap();
        assert_eq!(rendered(&set), vec!["192.168.1.1:53", "[fe80::1%eth0]:53"]);
    }

    #[test]
    fn test_all_invalid_config_uses_system_defaults() {
        let set = use_case(Ok(vec!["10.0.0.53"]))
            .execute(&[NameServerConfig::new("bogus")])
            .unwrap();
        assert_eq!(rendered(&set), vec!["10.0.0.53:53"]);
    }

    #[test]
    fn test_no_resolvers_anywhere_is_fatal() {
        let result = use_case(Ok(vec!["garbage"])).execute(&[]);
        assert_eq!(result.unwrap_err(), DomainError::NoValidResolvers);

        let result = use_case(Err(DomainError::IoError("missing".into())))
            .execute(&[NameServerConfig::new("nope")]);
        assert_eq!(result.unwrap_err(), DomainError::NoValidResolvers);
    }
}
