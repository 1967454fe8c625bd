use async_trait::async_trait;
use dns_noise_application::ports::{DnsExchange, DomainSource, NoiseMetricsSink};
use dns_noise_domain::validators::is_plausible_domain;
use dns_noise_domain::{DnsAnswer, DomainError, OutboundQuery, RecordType, ResolverEndpoint};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ============================================================================
// Mock DnsExchange
// ============================================================================

/// Answers per resolver display string; resolvers without a script fail
/// with a timeout.
#[derive(Clone, Default)]
pub struct MockDnsExchange {
    scripts: Arc<Mutex<HashMap<String, Result<DnsAnswer, DomainError>>>>,
    calls: Arc<Mutex<Vec<(String, String, RecordType)>>>,
}

impl MockDnsExchange {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(self, server: &str, answer: DnsAnswer) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(server.to_string(), Ok(answer));
        self
    }

    pub fn fail(self, server: &str, error: DomainError) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(server.to_string(), Err(error));
        self
    }

    pub fn calls(&self) -> Vec<(String, String, RecordType)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DnsExchange for MockDnsExchange {
    fn encode(&self, domain: &str, record_type: RecordType) -> Result<OutboundQuery, DomainError> {
        if !is_plausible_domain(domain) {
            return Err(DomainError::InvalidDomainName(domain.to_string()));
        }
        Ok(OutboundQuery::new(domain, record_type, 0, Vec::new()))
    }

    async fn exchange(
        &self,
        server: &ResolverEndpoint,
        query: &OutboundQuery,
    ) -> Result<DnsAnswer, DomainError> {
        let key = server.to_string();
        self.calls
            .lock()
            .unwrap()
            .push((key.clone(), query.domain.clone(), query.record_type));

        self.scripts
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or(Err(DomainError::TransportTimeout { server: key }))
    }
}

// ============================================================================
// Mock DomainSource
// ============================================================================

#[derive(Clone, Default)]
pub struct MockDomainSource {
    samples: Arc<Mutex<VecDeque<Result<String, DomainError>>>>,
    refreshes: Arc<AtomicUsize>,
}

impl MockDomainSource {
    pub fn with_samples(samples: Vec<Result<String, DomainError>>) -> Self {
        Self {
            samples: Arc::new(Mutex::new(samples.into())),
            refreshes: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn refreshes(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DomainSource for MockDomainSource {
    async fn refresh_if_due(&self) {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
    }

    async fn sample(&self) -> Result<String, DomainError> {
        self.samples
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(DomainError::EmptyCorpus))
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.samples.lock().unwrap().len() as u64)
    }
}

// ============================================================================
// Recording metrics sink
// ============================================================================

#[derive(Default)]
pub struct RecordingMetrics {
    pub requests: Mutex<Vec<(String, String)>>,
    pub responses: Mutex<Vec<(String, String, String)>>,
    pub latencies: Mutex<Vec<(String, String)>>,
}

impl RecordingMetrics {
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn responses(&self) -> Vec<(String, String, String)> {
        self.responses.lock().unwrap().clone()
    }

    pub fn latency_count(&self) -> usize {
        self.latencies.lock().unwrap().len()
    }
}

impl NoiseMetricsSink for RecordingMetrics {
    fn record_request(&self, record_type: &str, server: &str) {
        self.requests
            .lock()
            .unwrap()
            .push((record_type.to_string(), server.to_string()));
    }

    fn record_response(&self, record_type: &str, rcode: &str, server: &str) {
        self.responses.lock().unwrap().push((
            record_type.to_string(),
            rcode.to_string(),
            server.to_string(),
        ));
    }

    fn record_latency(&self, record_type: &str, server: &str, _latency_ms: f64) {
        self.latencies
            .lock()
            .unwrap()
            .push((record_type.to_string(), server.to_string()));
    }

    fn set_corpus_size(&self, _domains: u64) {}

    fn set_real_traffic_rate(&self, _queries_per_second: f64) {}
}
