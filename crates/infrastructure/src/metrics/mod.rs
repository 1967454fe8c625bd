pub mod exposition;
pub mod registry;

pub use exposition::render_prometheus;
pub use registry::{Histogram, NoiseMetrics, LATENCY_BUCKETS_MS};
