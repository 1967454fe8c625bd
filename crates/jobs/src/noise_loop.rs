use dns_noise_application::ports::{DomainSource, NoiseMetricsSink};
use dns_noise_application::services::PacingController;
use dns_noise_application::use_cases::GenerateNoiseUseCase;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Counters reported when the loop stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoiseLoopSummary {
    pub ticks: u64,
    pub skipped: u64,
    pub queries: u64,
}

/// The noise generator's main loop: refresh, pace, sleep, sample, query.
///
/// Runs on a single task so ticks never overlap. Cancellation interrupts
/// whichever await is pending: corpus refresh, activity fetch, sleep or the
/// tick's lookups.
pub struct NoiseLoopJob {
    source: Arc<dyn DomainSource>,
    tick: Arc<GenerateNoiseUseCase>,
    pacing: PacingController,
    metrics: Arc<dyn NoiseMetricsSink>,
    shutdown: CancellationToken,
}

impl NoiseLoopJob {
    pub fn new(
        source: Arc<dyn DomainSource>,
        tick: Arc<GenerateNoiseUseCase>,
        pacing: PacingController,
        metrics: Arc<dyn NoiseMetricsSink>,
    ) -> Self {
        Self {
            source,
            tick,
            pacing,
            metrics,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn start(self) -> JoinHandle<NoiseLoopSummary> {
        tokio::spawn(self.run())
    }

    pub async fn run(mut self) -> NoiseLoopSummary {
        info!(
            feedback = self.pacing.is_feedback(),
            families = ?self.tick.families(),
            "Starting noise loop"
        );

        let mut summary = NoiseLoopSummary::default();

        while !self.shutdown.is_cancelled() {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = self.source.refresh_if_due() => {}
            }

            let decision = tokio::select! {
                _ = self.shutdown.cancelled() => break,
                decision = self.pacing.next_delay() => decision,
            };
            if let Some(sample) = &decision.sample {
                self.metrics.set_real_traffic_rate(sample.rate_per_second());
            }

            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = tokio::time::sleep(decision.delay) => {}
            }

            let report = tokio::select! {
                _ = self.shutdown.cancelled() => break,
                report = self.tick.execute() => report,
            };
            summary.ticks += 1;
            if report.skipped() {
                summary.skipped += 1;
            }
            summary.queries += report.outcomes.len() as u64;

            debug!(
                domain = report.domain.as_deref().unwrap_or("-"),
                queries = report.outcomes.len(),
                slept_ms = decision.delay.as_millis() as u64,
                "Noise tick complete"
            );
        }

        info!(
            ticks = summary.ticks,
            skipped = summary.skipped,
            queries = summary.queries,
            "NoiseLoopJob: shutting down"
        );
        summary
    }
}
