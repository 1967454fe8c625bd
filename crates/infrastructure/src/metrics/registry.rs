use dashmap::DashMap;
use dns_noise_application::ports::NoiseMetricsSink;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Upper bounds of the latency histogram: 50ms steps from 50 to 750.
pub const LATENCY_BUCKETS_MS: [f64; 15] = [
    50.0, 100.0, 150.0, 200.0, 250.0, 300.0, 350.0, 400.0, 450.0, 500.0, 550.0, 600.0, 650.0,
    700.0, 750.0,
];

type RequestKey = (String, String);
type ResponseKey = (String, String, String);

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Histogram {
    /// Per-bucket (non-cumulative) counts; observations above the last
    /// bound only show up in `count`.
    pub buckets: [u64; LATENCY_BUCKETS_MS.len()],
    pub sum: f64,
    pub count: u64,
}

impl Histogram {
    pub fn observe(&mut self, value: f64) {
        if let Some(idx) = LATENCY_BUCKETS_MS.iter().position(|bound| value <= *bound) {
            self.buckets[idx] += 1;
        }
        self.sum += value;
        self.count += 1;
    }

    /// Cumulative counts per bound, as exposed to scrapers.
    pub fn cumulative(&self) -> [u64; LATENCY_BUCKETS_MS.len()] {
        let mut out = [0u64; LATENCY_BUCKETS_MS.len()];
        let mut running = 0;
        for (slot, n) in out.iter_mut().zip(self.buckets.iter()) {
            running += n;
            *slot = running;
        }
        out
    }
}

/// In-process metrics registry shared by the noise loop and the listener.
///
/// Counters live in `DashMap`s keyed by label tuples; gauges are atomics
/// (the traffic rate is stored as `f64` bits).
#[derive(Clone, Default)]
pub struct NoiseMetrics {
    requests: Arc<DashMap<RequestKey, u64>>,
    responses: Arc<DashMap<ResponseKey, u64>>,
    latency: Arc<DashMap<RequestKey, Histogram>>,
    corpus_size: Arc<AtomicU64>,
    real_traffic_rate_bits: Arc<AtomicU64>,
}

impl NoiseMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self, record_type: &str, server: &str) -> u64 {
        self.requests
            .get(&(record_type.to_string(), server.to_string()))
            .map(|v| *v)
            .unwrap_or(0)
    }

    pub fn responses(&self, record_type: &str, rcode: &str, server: &str) -> u64 {
        self.responses
            .get(&(
                record_type.to_string(),
                rcode.to_string(),
                server.to_string(),
            ))
            .map(|v| *v)
            .unwrap_or(0)
    }

    pub fn latency(&self, record_type: &str, server: &str) -> Option<Histogram> {
        self.latency
            .get(&(record_type.to_string(), server.to_string()))
            .map(|h| h.clone())
    }

    pub fn corpus_size(&self) -> u64 {
        self.corpus_size.load(Ordering::Relaxed)
    }

    pub fn real_traffic_rate(&self) -> f64 {
        f64::from_bits(self.real_traffic_rate_bits.load(Ordering::Relaxed))
    }

    pub fn request_series(&self) -> Vec<(RequestKey, u64)> {
        let mut series: Vec<_> = self
            .requests
            .iter()
            .map(|e| (e.key().clone(), *e.value()))
            .collect();
        series.sort();
        series
    }

    pub fn response_series(&self) -> Vec<(ResponseKey, u64)> {
        let mut series: Vec<_> = self
            .responses
            .iter()
            .map(|e| (e.key().clone(), *e.value()))
            .collect();
        series.sort();
        series
    }

    pub fn latency_series(&self) -> Vec<(RequestKey, Histogram)> {
        let mut series: Vec<_> = self
            .latency
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        series.sort_by(|a, b| a.0.cmp(&b.0));
        series
    }
}

impl NoiseMetricsSink for NoiseMetrics {
    fn record_request(&self, record_type: &str, server: &str) {
        self.requests
            .entry((record_type.to_string(), server.to_string()))
            .and_modify(|c| *c += 1)
            .or_insert(1);
    }

    fn record_response(&self, record_type: &str, rcode: &str, server: &str) {
        self.responses
            .entry((
                record_type.to_string(),
                rcode.to_string(),
                server.to_string(),
            ))
            .and_modify(|c| *c += 1)
            .or_insert(1);
    }

    fn record_latency(&self, record_type: &str, server: &str, latency_ms: f64) {
        self.latency
            .entry((record_type.to_string(), server.to_string()))
            .or_default()
            .observe(latency_ms);
    }

    fn set_corpus_size(&self, domains: u64) {
        self.corpus_size.store(domains, Ordering::Relaxed);
    }

    fn set_real_traffic_rate(&self, queries_per_second: f64) {
        self.real_traffic_rate_bits
            .store(queries_per_second.to_bits(), Ordering::Relaxed);
    }
}
