use super::LookupDomainUseCase;
use crate::ports::DomainSource;
use dns_noise_domain::{QueryOutcome, RecordType};
use std::sync::Arc;
use tracing::warn;

/// Record types to ask for each tick. AAAA goes first when enabled.
pub fn query_families(ipv4: bool, ipv6: bool) -> Vec<RecordType> {
    let mut families = Vec::with_capacity(2);
    if ipv6 {
        families.push(RecordType::AAAA);
    }
    if ipv4 {
        families.push(RecordType::A);
    }
    families
}

/// Resolves configured type names to record types, skipping any already in
/// `families`.
pub fn extra_query_types(families: &[RecordType], names: &[String]) -> Vec<RecordType> {
    let mut extra: Vec<RecordType> = Vec::with_capacity(names.len());
    for name in names {
        let (record_type, recognized) = RecordType::normalize(name);
        if !recognized {
            warn!(requested = %name, "Unexpected query type, defaulting to 'A'");
        }
        if !families.contains(&record_type) && !extra.contains(&record_type) {
            extra.push(record_type);
        }
    }
    extra
}

#[derive(Debug, Clone, Default)]
pub struct NoiseTickReport {
    /// `None` when sampling failed and the tick was skipped.
    pub domain: Option<String>,
    pub outcomes: Vec<(RecordType, QueryOutcome)>,
}

impl NoiseTickReport {
    pub fn skipped(&self) -> bool {
        self.domain.is_none()
    }
}

/// One tick's worth of noise: sample a domain and query it.
pub struct GenerateNoiseUseCase {
    source: Arc<dyn DomainSource>,
    lookup: Arc<LookupDomainUseCase>,
    families: Vec<RecordType>,
}

impl GenerateNoiseUseCase {
    pub fn new(
        source: Arc<dyn DomainSource>,
        lookup: Arc<LookupDomainUseCase>,
        ipv4: bool,
        ipv6: bool,
    ) -> Self {
        Self {
            source,
            lookup,
            families: query_families(ipv4, ipv6),
        }
    }

    /// Appends configured extra record types to the per-tick query list.
    pub fn with_extra_types(mut self, names: &[String]) -> Self {
        let extra = extra_query_types(&self.families, names);
        self.families.extend(extra);
        self
    }

    pub fn families(&self) -> &[RecordType] {
        &self.families
    }

    pub async fn execute(&self) -> NoiseTickReport {
        let domain = match self.source.sample().await {
            Ok(domain) if !domain.trim().is_empty() => domain,
            Ok(_) => {
                warn!("Sampled an empty domain, skipping tick");
                return NoiseTickReport::default();
            }
            Err(e) => {
                warn!(error = %e, "Unable to sample a domain, skipping tick");
                return NoiseTickReport::default();
            }
        };

        let mut outcomes = Vec::with_capacity(self.families.len());
        for record_type in &self.families {
            let outcome = self.lookup.execute(&domain, *record_type).await;
            outcomes.push((*record_type, outcome));
        }

        NoiseTickReport {
            domain: Some(domain),
            outcomes,
        }
    }
}
