use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use dns_noise_application::ports::{ActivityMonitor, DnsExchange, DomainSource, NoiseMetricsSink};
use dns_noise_domain::{
    ActivitySample, DnsAnswer, DomainError, OutboundQuery, Rcode, RecordType, ResolverEndpoint,
};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

// ============================================================================
// Domain source that cancels the loop after a fixed number of samples
// ============================================================================

pub struct CancellingDomainSource {
    token: CancellationToken,
    cancel_after: usize,
    fail_every: Option<usize>,
    samples: AtomicUsize,
    refreshes: AtomicUsize,
}

impl CancellingDomainSource {
    pub fn new(token: CancellationToken, cancel_after: usize) -> Self {
        Self {
            token,
            cancel_after,
            fail_every: None,
            samples: AtomicUsize::new(0),
            refreshes: AtomicUsize::new(0),
        }
    }

    /// Every `n`-th sample fails with `EmptyCorpus`.
    pub fn failing_every(mut self, n: usize) -> Self {
        self.fail_every = Some(n);
        self
    }

    pub fn samples(&self) -> usize {
        self.samples.load(Ordering::SeqCst)
    }

    pub fn refreshes(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DomainSource for CancellingDomainSource {
    async fn refresh_if_due(&self) {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
    }

    async fn sample(&self) -> Result<String, DomainError> {
        let n = self.samples.fetch_add(1, Ordering::SeqCst) + 1;
        if n >= self.cancel_after {
            self.token.cancel();
        }
        match self.fail_every {
            Some(every) if n % every == 0 => Err(DomainError::EmptyCorpus),
            _ => Ok(format!("host{}.example", n)),
        }
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.cancel_after as u64)
    }
}

// ============================================================================
// DNS exchange answering NOERROR with no records
// ============================================================================

#[derive(Default)]
pub struct CountingExchange {
    pub calls: Mutex<Vec<(String, RecordType)>>,
}

impl CountingExchange {
    pub fn calls(&self) -> Vec<(String, RecordType)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DnsExchange for CountingExchange {
    fn encode(&self, domain: &str, record_type: RecordType) -> Result<OutboundQuery, DomainError> {
        Ok(OutboundQuery::new(domain, record_type, 0, Vec::new()))
    }

    async fn exchange(
        &self,
        _server: &ResolverEndpoint,
        query: &OutboundQuery,
    ) -> Result<DnsAnswer, DomainError> {
        self.calls
            .lock()
            .unwrap()
            .push((query.domain.clone(), query.record_type));
        Ok(DnsAnswer::new(Rcode::NOERROR, vec![]))
    }
}

// ============================================================================
// Activity monitor with a fixed count
// ============================================================================

pub struct FixedMonitor {
    pub count: u64,
    pub calls: AtomicUsize,
}

impl FixedMonitor {
    pub fn new(count: u64) -> Self {
        Self {
            count,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ActivityMonitor for FixedMonitor {
    async fn fetch_recent_query_count(
        &self,
        window: Duration,
    ) -> Result<ActivitySample, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let end = Utc::now();
        let start = end - ChronoDuration::from_std(window).unwrap();
        Ok(ActivitySample::new(start, end, self.count))
    }

    fn host(&self) -> &str {
        "pi.hole"
    }
}

// ============================================================================
// Metrics sink keeping only the gauges
// ============================================================================

#[derive(Default)]
pub struct GaugeMetrics {
    pub rate_bits: AtomicU64,
    pub rate_updates: AtomicUsize,
}

impl GaugeMetrics {
    pub fn rate(&self) -> f64 {
        f64::from_bits(self.rate_bits.load(Ordering::SeqCst))
    }
}

impl NoiseMetricsSink for GaugeMetrics {
    fn record_request(&self, _record_type: &str, _server: &str) {}

    fn record_response(&self, _record_type: &str, _rcode: &str, _server: &str) {}

    fn record_latency(&self, _record_type: &str, _server: &str, _latency_ms: f64) {}

    fn set_corpus_size(&self, _domains: u64) {}

    fn set_real_traffic_rate(&self, queries_per_second: f64) {
        self.rate_bits
            .store(queries_per_second.to_bits(), Ordering::SeqCst);
        self.rate_updates.fetch_add(1, Ordering::SeqCst);
    }
}

// ============================================================================
// Ports that block for a long time, for cancellation tests
// ============================================================================

/// Domain source whose refresh hangs for `stall`.
pub struct StallingDomainSource {
    pub stall: Duration,
    pub refreshes: AtomicUsize,
}

impl StallingDomainSource {
    pub fn new(stall: Duration) -> Self {
        Self {
            stall,
            refreshes: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl DomainSource for StallingDomainSource {
    async fn refresh_if_due(&self) {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.stall).await;
    }

    async fn sample(&self) -> Result<String, DomainError> {
        Ok("stalled.example".to_string())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(1)
    }
}

/// Exchange that never answers within a test's lifetime.
pub struct StallingExchange {
    pub stall: Duration,
    pub started: AtomicUsize,
}

impl StallingExchange {
    pub fn new(stall: Duration) -> Self {
        Self {
            stall,
            started: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl DnsExchange for StallingExchange {
    fn encode(&self, domain: &str, record_type: RecordType) -> Result<OutboundQuery, DomainError> {
        Ok(OutboundQuery::new(domain, record_type, 0, Vec::new()))
    }

    async fn exchange(
        &self,
        _server: &ResolverEndpoint,
        _query: &OutboundQuery,
    ) -> Result<DnsAnswer, DomainError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.stall).await;
        Ok(DnsAnswer::new(Rcode::NOERROR, vec![]))
    }
}

/// Activity monitor whose fetch hangs for `stall`.
pub struct StallingMonitor {
    pub stall: Duration,
    pub calls: AtomicUsize,
}

impl StallingMonitor {
    pub fn new(stall: Duration) -> Self {
        Self {
            stall,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ActivityMonitor for StallingMonitor {
    async fn fetch_recent_query_count(
        &self,
        _window: Duration,
    ) -> Result<ActivitySample, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.stall).await;
        Err(DomainError::ActivityFetch("stalled".into()))
    }

    fn host(&self) -> &str {
        "pi.hole"
    }
}
