use super::registry::{NoiseMetrics, LATENCY_BUCKETS_MS};
use std::fmt::Write;

fn escape(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

/// Renders the registry in the Prometheus text exposition format.
pub fn render_prometheus(metrics: &NoiseMetrics) -> String {
    let mut out = String::with_capacity(4096);

    // Writing to a String never fails.
    let _ = writeln!(out, "# HELP dns_noise_request Noise queries sent, by type and server.");
    let _ = writeln!(out, "# TYPE dns_noise_request counter");
    for ((record_type, server), value) in metrics.request_series() {
        let _ = writeln!(
            out,
            "dns_noise_request{{type=\"{}\",server=\"{}\"}} {}",
            escape(&record_type),
            escape(&server),
            value
        );
    }

    let _ = writeln!(out, "# HELP dns_noise_response Noise answers received, by type, rcode and server.");
    let _ = writeln!(out, "# TYPE dns_noise_response counter");
    for ((record_type, rcode, server), value) in metrics.response_series() {
        let _ = writeln!(
            out,
            "dns_noise_response{{type=\"{}\",rcode=\"{}\",server=\"{}\"}} {}",
            escape(&record_type),
            escape(rcode.as_str()),
            escape(&server),
            value
        );
    }

    let _ = writeln!(out, "# HELP dns_noise_responsetime Noise query latency in milliseconds.");
    let _ = writeln!(out, "# TYPE dns_noise_responsetime histogram");
    for ((record_type, server), histogram) in metrics.latency_series() {
        let labels = format!(
            "type=\"{}\",server=\"{}\"",
            escape(&record_type),
            escape(&server)
        );
        for (bound, count) in LATENCY_BUCKETS_MS.iter().zip(histogram.cumulative()) {
            let _ = writeln!(
                out,
                "dns_noise_responsetime_bucket{{{},le=\"{}\"}} {}",
                labels, bound, count
            );
        }
        let _ = writeln!(
            out,
            "dns_noise_responsetime_bucket{{{},le=\"+Inf\"}} {}",
            labels, histogram.count
        );
        let _ = writeln!(out, "dns_noise_responsetime_sum{{{}}} {}", labels, histogram.sum);
        let _ = writeln!(out, "dns_noise_responsetime_count{{{}}} {}", labels, histogram.count);
    }

    let _ = writeln!(out, "# HELP dns_noise_domains Domains available in the corpus.");
    let _ = writeln!(out, "# TYPE dns_noise_domains gauge");
    let _ = writeln!(out, "dns_noise_domains {}", metrics.corpus_size());

    let _ = writeln!(out, "# HELP dns_noise_real_traffic_rate Observed real queries per second.");
    let _ = writeln!(out, "# TYPE dns_noise_real_traffic_rate gauge");
    let _ = writeln!(out, "dns_noise_real_traffic_rate {}", metrics.real_traffic_rate());

    out
}
