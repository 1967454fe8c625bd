pub mod activity_monitor;
pub mod dns_exchange;
pub mod domain_source;
pub mod metrics_sink;
pub mod system_resolvers;

pub use activity_monitor::ActivityMonitor;
pub use dns_exchange::DnsExchange;
pub use domain_source::DomainSource;
pub use metrics_sink::{NoiseMetricsSink, NoopMetricsSink};
pub use system_resolvers::SystemResolverConfig;
