use dns_noise_application::ports::{DnsExchange, DomainSource, NoopMetricsSink};
use dns_noise_application::services::{FeedbackSettings, PacingBounds, PacingController};
use dns_noise_application::use_cases::{GenerateNoiseUseCase, LookupDomainUseCase};
use dns_noise_domain::{RecordType, ResolverEndpoint, ResolverSet};
use dns_noise_jobs::{JobRunner, NoiseLoopJob};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

mod helpers;
use helpers::{
    CancellingDomainSource, CountingExchange, FixedMonitor, GaugeMetrics, StallingDomainSource,
    StallingExchange, StallingMonitor,
};

fn resolvers() -> Arc<ResolverSet> {
    Arc::new(ResolverSet::new(vec![ResolverEndpoint::parse("127.0.0.1", 53, None).unwrap()]).unwrap())
}

fn fast_bounds() -> PacingBounds {
    PacingBounds::new(Duration::from_millis(1), Duration::from_millis(2)).unwrap()
}

fn tick(
    source: Arc<dyn DomainSource>,
    exchange: Arc<dyn DnsExchange>,
    ipv4: bool,
    ipv6: bool,
) -> Arc<GenerateNoiseUseCase> {
    let lookup = Arc::new(LookupDomainUseCase::new(
        resolvers(),
        exchange,
        Arc::new(NoopMetricsSink),
    ));
    Arc::new(GenerateNoiseUseCase::new(source, lookup, ipv4, ipv6))
}

#[tokio::test]
async fn test_loop_runs_until_cancelled() {
    let token = CancellationToken::new();
    let source = Arc::new(CancellingDomainSource::new(token.clone(), 5));
    let exchange = Arc::new(CountingExchange::default());

    let job = NoiseLoopJob::new(
        source.clone(),
        tick(source.clone(), exchange.clone(), true, true),
        PacingController::static_random(fast_bounds()),
        Arc::new(NoopMetricsSink),
    )
    .with_cancellation(token);

    let summary = tokio::time::timeout(Duration::from_secs(5), job.run())
        .await
        .expect("loop did not stop after cancellation");

    assert_eq!(summary.ticks, 5);
    assert_eq!(summary.skipped, 0);
    assert_eq!(summary.queries, 10);
    assert_eq!(source.samples(), 5);
    assert_eq!(source.refreshes(), 5);

    let calls = exchange.calls();
    assert_eq!(calls.len(), 10);
    assert_eq!(calls[0], ("host1.example".to_string(), RecordType::AAAA));
    assert_eq!(calls[1], ("host1.example".to_string(), RecordType::A));
}

#[tokio::test]
async fn test_sampling_failures_skip_the_tick() {
    let token = CancellationToken::new();
    let source = Arc::new(CancellingDomainSource::new(token.clone(), 6).failing_every(3));
    let exchange = Arc::new(CountingExchange::default());

    let job = NoiseLoopJob::new(
        source.clone(),
        tick(source.clone(), exchange.clone(), true, false),
        PacingController::static_random(fast_bounds()),
        Arc::new(NoopMetricsSink),
    )
    .with_cancellation(token);

    let summary = job.run().await;

    assert_eq!(summary.ticks, 6);
    assert_eq!(summary.skipped, 2);
    assert_eq!(summary.queries, 4);
    assert!(exchange
        .calls()
        .iter()
        .all(|(_, record_type)| *record_type == RecordType::A));
}

#[tokio::test]
async fn test_cancellation_interrupts_sleep() {
    let token = CancellationToken::new();
    let source = Arc::new(CancellingDomainSource::new(token.clone(), usize::MAX));
    let exchange = Arc::new(CountingExchange::default());
    let long = PacingBounds::new(Duration::from_secs(3_600), Duration::from_secs(3_600)).unwrap();

    let running = JobRunner::new()
        .with_cancellation(token)
        .with_noise_loop(NoiseLoopJob::new(
            source.clone(),
            tick(source.clone(), exchange.clone(), true, true),
            PacingController::static_random(long),
            Arc::new(NoopMetricsSink),
        ))
        .start();

    tokio::time::sleep(Duration::from_millis(50)).await;

    let summary = tokio::time::timeout(Duration::from_secs(5), running.shutdown())
        .await
        .expect("shutdown timed out")
        .expect("noise loop was registered");

    assert_eq!(summary.ticks, 0);
    assert!(exchange.calls().is_empty());
}

#[tokio::test]
async fn test_feedback_sample_updates_rate_gauge() {
    let token = CancellationToken::new();
    let source = Arc::new(CancellingDomainSource::new(token.clone(), 3));
    let exchange = Arc::new(CountingExchange::default());
    let monitor = Arc::new(FixedMonitor::new(300_000));
    let metrics = Arc::new(GaugeMetrics::default());

    // 300s × 10 / 300000 = 10ms, clamped into [1ms, 20ms].
    let pacing = PacingController::feedback(
        PacingBounds::new(Duration::from_millis(1), Duration::from_millis(20)).unwrap(),
        monitor.clone(),
        FeedbackSettings {
            activity_window: Duration::from_secs(300),
            refresh_interval: Duration::from_secs(60),
            noise_percentage: 10,
        },
    );

    let job = NoiseLoopJob::new(
        source.clone(),
        tick(source.clone(), exchange, true, true),
        pacing,
        metrics.clone(),
    )
    .with_cancellation(token);

    let summary = job.run().await;

    assert_eq!(summary.ticks, 3);
    // Sticky between refreshes: one fetch for three ticks.
    assert_eq!(monitor.calls.load(Ordering::SeqCst), 1);
    assert_eq!(metrics.rate_updates.load(Ordering::SeqCst), 1);
    assert!((metrics.rate() - 1_000.0).abs() < 1e-6);
}

const STALL: Duration = Duration::from_secs(30);

async fn shutdown_promptly(running: dns_noise_jobs::RunningJobs) -> dns_noise_jobs::NoiseLoopSummary {
    tokio::time::sleep(Duration::from_millis(50)).await;
    tokio::time::timeout(Duration::from_secs(2), running.shutdown())
        .await
        .expect("loop kept running after cancellation")
        .expect("noise loop was registered")
}

#[tokio::test]
async fn test_cancellation_interrupts_corpus_refresh() {
    let source = Arc::new(StallingDomainSource::new(STALL));
    let exchange = Arc::new(CountingExchange::default());

    let running = JobRunner::new()
        .with_noise_loop(NoiseLoopJob::new(
            source.clone(),
            tick(source.clone(), exchange.clone(), true, true),
            PacingController::static_random(fast_bounds()),
            Arc::new(NoopMetricsSink),
        ))
        .start();

    let summary = shutdown_promptly(running).await;

    assert_eq!(source.refreshes.load(Ordering::SeqCst), 1);
    assert_eq!(summary.ticks, 0);
    assert!(exchange.calls().is_empty());
}

#[tokio::test]
async fn test_cancellation_interrupts_activity_fetch() {
    let token = CancellationToken::new();
    let source = Arc::new(CancellingDomainSource::new(token.clone(), usize::MAX));
    let monitor = Arc::new(StallingMonitor::new(STALL));

    let pacing = PacingController::feedback(
        fast_bounds(),
        monitor.clone(),
        FeedbackSettings {
            activity_window: Duration::from_secs(300),
            refresh_interval: Duration::from_secs(60),
            noise_percentage: 10,
        },
    );

    let running = JobRunner::new()
        .with_cancellation(token)
        .with_noise_loop(NoiseLoopJob::new(
            source.clone(),
            tick(source.clone(), Arc::new(CountingExchange::default()), true, true),
            pacing,
            Arc::new(NoopMetricsSink),
        ))
        .start();

    let summary = shutdown_promptly(running).await;

    assert_eq!(monitor.calls.load(Ordering::SeqCst), 1);
    assert_eq!(summary.ticks, 0);
    assert_eq!(source.samples(), 0);
}

#[tokio::test]
async fn test_cancellation_interrupts_lookups() {
    let token = CancellationToken::new();
    let source = Arc::new(CancellingDomainSource::new(token.clone(), usize::MAX));
    let exchange = Arc::new(StallingExchange::new(STALL));

    let running = JobRunner::new()
        .with_cancellation(token)
        .with_noise_loop(NoiseLoopJob::new(
            source.clone(),
            tick(source.clone(), exchange.clone(), true, true),
            PacingController::static_random(fast_bounds()),
            Arc::new(NoopMetricsSink),
        ))
        .start();

    let summary = shutdown_promptly(running).await;

    // The first lookup was in flight; the interrupted tick is not counted.
    assert_eq!(exchange.started.load(Ordering::SeqCst), 1);
    assert_eq!(summary.ticks, 0);
}
