use crate::ports::{DnsExchange, NoiseMetricsSink};
use dns_noise_domain::{AnswerRecord, DomainError, QueryOutcome, RecordType, ResolverSet};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Issues one noise lookup, failing over through the resolver set in order.
///
/// The first resolver that completes an exchange decides the outcome, even
/// when it answers with NXDOMAIN or another error code.
pub struct LookupDomainUseCase {
    resolvers: Arc<ResolverSet>,
    exchange: Arc<dyn DnsExchange>,
    metrics: Arc<dyn NoiseMetricsSink>,
}

impl LookupDomainUseCase {
    pub fn new(
        resolvers: Arc<ResolverSet>,
        exchange: Arc<dyn DnsExchange>,
        metrics: Arc<dyn NoiseMetricsSink>,
    ) -> Self {
        Self {
            resolvers,
            exchange,
            metrics,
        }
    }

    pub async fn execute(&self, domain: &str, record_type: RecordType) -> QueryOutcome {
        let type_label = record_type.as_str();

        let query = match self.exchange.encode(domain, record_type) {
            Ok(query) => query,
            Err(e) => {
                warn!(domain, record_type = type_label, error = %e, "Query could not be encoded");
                return QueryOutcome::TransportFailure(e);
            }
        };

        for server in self.resolvers.iter() {
            let server_label = server.display_arc();
            self.metrics.record_request(type_label, &server_label);

            let start = Instant::now();
            let answer = match self.exchange.exchange(server, &query).await {
                Ok(answer) => answer,
                Err(e) => {
                    warn!(
                        server = %server_label,
                        domain,
                        record_type = type_label,
                        error = %e,
                        "Exchange failed, trying next resolver"
                    );
                    continue;
                }
            };

            let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
            self.metrics
                .record_latency(type_label, &server_label, latency_ms);

            let rcode = answer.rcode;
            if !rcode.is_success() {
                self.metrics
                    .record_response(type_label, rcode.as_str(), &server_label);
                info!(
                    server = %server_label,
                    domain,
                    record_type = type_label,
                    rcode = %rcode,
                    "Negative answer"
                );
                return QueryOutcome::ServerError {
                    rcode,
                    server: server_label,
                };
            }

            for record in &answer.records {
                self.metrics
                    .record_response(&record.type_label(), rcode.as_str(), &server_label);
                match record {
                    AnswerRecord::Unsupported(code) => {
                        warn!(domain, type_code = code, "Unexpected answer type");
                    }
                    supported => {
                        debug!(
                            domain,
                            record_type = %record.type_label(),
                            answer = %supported,
                            rcode = %rcode,
                            "Answer record"
                        );
                    }
                }
            }

            info!(
                server = %server_label,
                domain,
                record_type = type_label,
                answers = answer.records.len(),
                latency_ms = latency_ms as u64,
                "Noise query answered"
            );

            return QueryOutcome::Answered {
                records: answer.records,
                rcode,
                server: server_label,
            };
        }

        let attempted = self.resolvers.len();
        warn!(
            domain,
            record_type = type_label,
            attempted,
            "No resolver completed the exchange"
        );
        QueryOutcome::TransportFailure(DomainError::TransportAllServersUnreachable { attempted })
    }
}
