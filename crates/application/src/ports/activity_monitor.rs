use async_trait::async_trait;
use dns_noise_domain::{ActivitySample, DomainError};
use std::time::Duration;

/// Source of real (non-noise) query volume on the local filtering appliance.
#[async_trait]
pub trait ActivityMonitor: Send + Sync {
    /// Counts real queries observed over the last `window`, excluding the
    /// noise generator's own traffic.
    ///
    /// A zero count is reported as `DomainError::NoActivitySignal` rather
    /// than an empty sample.
    async fn fetch_recent_query_count(&self, window: Duration)
        -> Result<ActivitySample, DomainError>;

    /// Host name used in log lines.
    fn host(&self) -> &str;
}
