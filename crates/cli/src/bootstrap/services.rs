use dns_noise_application::ports::{ActivityMonitor, DomainSource, NoiseMetricsSink};
use dns_noise_application::services::{FeedbackSettings, PacingBounds, PacingController};
use dns_noise_application::use_cases::{
    BuildResolverSetUseCase, GenerateNoiseUseCase, LookupDomainUseCase,
};
use dns_noise_domain::Config;
use dns_noise_infrastructure::corpus::{CorpusDomainSource, CsvFetcher};
use dns_noise_infrastructure::dns::HickoryDnsExchange;
use dns_noise_infrastructure::metrics::NoiseMetrics;
use dns_noise_infrastructure::pihole::PiholeActivityMonitor;
use dns_noise_infrastructure::repositories::SqliteDomainRepository;
use dns_noise_infrastructure::system::ResolvConfReader;
use dns_noise_jobs::NoiseLoopJob;
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{info, warn};

/// Everything the noise loop needs, wired from the configuration.
pub struct NoiseServices {
    pub metrics: NoiseMetrics,
    pub corpus: Arc<CorpusDomainSource>,
    pub tick: Arc<GenerateNoiseUseCase>,
    pub pacing: PacingController,
}

impl NoiseServices {
    pub fn new(config: &Config, pool: SqlitePool) -> anyhow::Result<Self> {
        let metrics = NoiseMetrics::new();
        let sink: Arc<dyn NoiseMetricsSink> = Arc::new(metrics.clone());

        let resolvers = BuildResolverSetUseCase::new(Arc::new(ResolvConfReader::new()))
            .execute(&config.nameservers)?;
        info!(
            resolvers = resolvers.len(),
            primary = %resolvers.primary(),
            "Resolver set ready"
        );

        let exchange = Arc::new(HickoryDnsExchange::new(config.noise.query_timeout()));
        let lookup = Arc::new(LookupDomainUseCase::new(
            Arc::new(resolvers),
            exchange,
            Arc::clone(&sink),
        ));

        let corpus = Arc::new(CorpusDomainSource::new(
            Arc::new(SqliteDomainRepository::new(pool)),
            CsvFetcher::new()?,
            config.sources.clone(),
            Arc::clone(&sink),
        ));

        let tick = Arc::new(
            GenerateNoiseUseCase::new(
                corpus.clone(),
                lookup,
                config.noise.ipv4,
                config.noise.ipv6,
            )
            .with_extra_types(&config.noise.extra_types),
        );

        let pacing = Self::build_pacing(config)?;

        Ok(Self {
            metrics,
            corpus,
            tick,
            pacing,
        })
    }

    fn build_pacing(config: &Config) -> anyhow::Result<PacingController> {
        let bounds = PacingBounds::new(config.noise.min_period(), config.noise.max_period())?;

        if !config.pihole.is_enabled() {
            info!(
                min_ms = config.noise.min_period_ms,
                max_ms = config.noise.max_period_ms,
                "Pi-hole not configured, using random pacing"
            );
            return Ok(PacingController::static_random(bounds));
        }

        let pihole = &config.pihole;
        if pihole.filter.is_empty() {
            let local = hostname::get()
                .map(|h| h.to_string_lossy().into_owned())
                .unwrap_or_default();
            warn!(
                local_host = %local,
                "Pi-hole filter is empty; this host's own noise will count as real traffic"
            );
        }

        let monitor: Arc<dyn ActivityMonitor> = Arc::new(PiholeActivityMonitor::new(
            pihole.host.clone(),
            pihole.auth_token.clone(),
            pihole.filter.clone(),
            pihole.request_timeout(),
        )?);

        info!(
            host = %pihole.host,
            noise_percentage = pihole.noise_percentage,
            window_secs = pihole.activity_period_secs,
            refresh_secs = pihole.refresh_secs,
            "Using Pi-hole activity for pacing"
        );

        Ok(PacingController::feedback(
            bounds,
            monitor,
            FeedbackSettings {
                activity_window: pihole.activity_period(),
                refresh_interval: pihole.refresh_interval(),
                noise_percentage: pihole.noise_percentage,
            },
        ))
    }

    /// Loads the corpus sources, or reuses the stored rows.
    pub async fn prepare_corpus(&self, reuse_db: bool) -> anyhow::Result<u64> {
        let count = if reuse_db {
            info!("Reusing existing domains database");
            self.corpus.assume_loaded().await?
        } else {
            self.corpus.load_all().await?
        };

        if count == 0 {
            warn!("Domain corpus is empty; ticks will be skipped until a source loads");
        } else {
            info!(domains = count, "Domain corpus ready");
        }
        Ok(count)
    }

    pub fn into_noise_loop(self) -> NoiseLoopJob {
        let source: Arc<dyn DomainSource> = self.corpus;
        NoiseLoopJob::new(
            source,
            self.tick,
            self.pacing,
            Arc::new(self.metrics),
        )
    }
}
