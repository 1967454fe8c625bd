/// Telemetry emitted by the dispatcher and the noise loop.
///
/// Implementations must be safe for concurrent reads from a metrics
/// listener while the loop writes.
pub trait NoiseMetricsSink: Send + Sync {
    fn record_request(&self, record_type: &str, server: &str);

    fn record_response(&self, record_type: &str, rcode: &str, server: &str);

    fn record_latency(&self, record_type: &str, server: &str, latency_ms: f64);

    fn set_corpus_size(&self, domains: u64);

    fn set_real_traffic_rate(&self, queries_per_second: f64);
}

/// Sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetricsSink;

impl NoiseMetricsSink for NoopMetricsSink {
    fn record_request(&self, _record_type: &str, _server: &str) {}

    fn record_response(&self, _record_type: &str, _rcode: &str, _server: &str) {}

    fn record_latency(&self, _record_type: &str, _server: &str, _latency_ms: f64) {}

    fn set_corpus_size(&self, _domains: u64) {}

    fn set_real_traffic_rate(&self, _queries_per_second: f64) {}
}
