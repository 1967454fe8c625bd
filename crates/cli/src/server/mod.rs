pub mod metrics;

pub use metrics::serve_metrics;
