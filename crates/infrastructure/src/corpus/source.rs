use super::fetcher::CsvFetcher;
use crate::repositories::SqliteDomainRepository;
use async_trait::async_trait;
use dns_noise_application::ports::{DomainSource, NoiseMetricsSink};
use dns_noise_domain::config::SourceConfig;
use dns_noise_domain::DomainError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Domain corpus stored in SQLite and fed by the configured CSV sources.
///
/// Sampling draws a uniform position below the cached row count and fetches
/// that row by its dense `seq` key, so each draw costs one indexed lookup.
pub struct CorpusDomainSource {
    repository: Arc<SqliteDomainRepository>,
    fetcher: CsvFetcher,
    sources: Vec<SourceConfig>,
    last_attempt: Mutex<HashMap<String, Instant>>,
    cached_count: AtomicU64,
    metrics: Arc<dyn NoiseMetricsSink>,
}

impl CorpusDomainSource {
    pub fn new(
        repository: Arc<SqliteDomainRepository>,
        fetcher: CsvFetcher,
        sources: Vec<SourceConfig>,
        metrics: Arc<dyn NoiseMetricsSink>,
    ) -> Self {
        Self {
            repository,
            fetcher,
            sources,
            last_attempt: Mutex::new(HashMap::new()),
            cached_count: AtomicU64::new(0),
            metrics,
        }
    }

    /// Downloads every source and drops rows of labels no longer configured.
    pub async fn load_all(&self) -> Result<u64, DomainError> {
        self.prune_unconfigured().await?;
        for source in &self.sources {
            self.refresh_source(source).await;
        }
        self.count().await
    }

    /// Treats the stored corpus as freshly loaded; used with `--reuse-db`.
    pub async fn assume_loaded(&self) -> Result<u64, DomainError> {
        let now = Instant::now();
        let mut last_attempt = self.last_attempt.lock().await;
        for source in &self.sources {
            last_attempt.insert(source.label.clone(), now);
        }
        drop(last_attempt);
        self.count().await
    }

    async fn prune_unconfigured(&self) -> Result<(), DomainError> {
        for label in self.repository.labels().await? {
            if !self.sources.iter().any(|s| s.label == label) {
                let removed = self.repository.purge_label(&label).await?;
                info!(label = %label, removed, "Purged unconfigured domain source");
            }
        }
        Ok(())
    }

    async fn refresh_source(&self, source: &SourceConfig) {
        self.last_attempt
            .lock()
            .await
            .insert(source.label.clone(), Instant::now());

        let domains = match self.fetcher.fetch(source).await {
            Ok(domains) => domains,
            Err(e) => {
                warn!(label = %source.label, error = %e, "Domain source refresh failed, keeping previous data");
                return;
            }
        };

        if let Err(e) = self.repository.replace_label(&source.label, &domains).await {
            warn!(label = %source.label, error = %e, "Unable to store domain source");
            return;
        }

        match self.repository.count_label(&source.label).await {
            Ok(stored) => info!(label = %source.label, stored, "Loaded domain source"),
            Err(e) => debug!(label = %source.label, error = %e, "Unable to count stored rows"),
        }
    }

    async fn due_sources(&self) -> Vec<&SourceConfig> {
        let last_attempt = self.last_attempt.lock().await;
        self.sources
            .iter()
            .filter(|source| match last_attempt.get(&source.label) {
                None => true,
                Some(at) => source
                    .refresh_interval()
                    .is_some_and(|interval| at.elapsed() >= interval),
            })
            .collect()
    }

    async fn current_count(&self) -> Result<u64, DomainError> {
        match self.cached_count.load(Ordering::Relaxed) {
            0 => self.count().await,
            n => Ok(n),
        }
    }
}

#[async_trait]
impl DomainSource for CorpusDomainSource {
    async fn refresh_if_due(&self) {
        let due = self.due_sources().await;
        if due.is_empty() {
            return;
        }

        for source in due {
            self.refresh_source(source).await;
        }

        match self.count().await {
            Ok(count) => info!(domains = count, "Refreshed domains database"),
            Err(e) => warn!(error = %e, "Unable to count domains after refresh"),
        }
    }

    async fn sample(&self) -> Result<String, DomainError> {
        let count = self.current_count().await?;
        if count == 0 {
            return Err(DomainError::EmptyCorpus);
        }

        let position = fastrand::u64(..count);
        if let Some(domain) = self.repository.fetch_at(position).await? {
            return Ok(domain);
        }

        // The corpus shrank underneath the cached count.
        debug!(position, count, "Stale corpus count, recounting");
        let count = self.count().await?;
        if count == 0 {
            return Err(DomainError::EmptyCorpus);
        }
        self.repository
            .fetch_at(fastrand::u64(..count))
            .await?
            .ok_or(DomainError::EmptyCorpus)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let count = self.repository.count().await?;
        self.cached_count.store(count, Ordering::Relaxed);
        self.metrics.set_corpus_size(count);
        Ok(count)
    }
}
