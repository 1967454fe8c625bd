use async_trait::async_trait;
use dns_noise_domain::DomainError;

/// Refreshable corpus of candidate domain names.
#[async_trait]
pub trait DomainSource: Send + Sync {
    /// Reloads any corpus source whose refresh interval has elapsed.
    /// Failures are logged by the implementation and leave the old data.
    async fn refresh_if_due(&self);

    /// Uniform random draw over the corpus. Fails on an empty or
    /// unreachable corpus.
    async fn sample(&self) -> Result<String, DomainError>;

    /// Number of names currently available.
    async fn count(&self) -> Result<u64, DomainError>;
}
