//! Inter-query pacing.
//!
//! Two modes, chosen once at startup:
//! - **Feedback**: the delay follows real traffic measured by an
//!   [`ActivityMonitor`], re-measured every refresh interval and kept
//!   unchanged in between.
//! - **Static random**: every tick draws a fresh delay uniformly from the
//!   configured bounds.
//!
//! Both modes add 0–10% jitter on top of the base delay.

use crate::ports::ActivityMonitor;
use dns_noise_domain::{ActivitySample, ConfigError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const MAX_JITTER_FRACTION: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingBounds {
    min: Duration,
    max: Duration,
}

impl PacingBounds {
    pub fn new(min: Duration, max: Duration) -> Result<Self, ConfigError> {
        if min > max {
            return Err(ConfigError::InvalidPacingBounds {
                min_ms: min.as_millis() as u64,
                max_ms: max.as_millis() as u64,
            });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    pub fn clamp(&self, delay: Duration) -> Duration {
        delay.clamp(self.min, self.max)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FeedbackSettings {
    pub activity_window: Duration,
    pub refresh_interval: Duration,
    pub noise_percentage: u32,
}

enum PacingMode {
    Feedback {
        monitor: Arc<dyn ActivityMonitor>,
        settings: FeedbackSettings,
    },
    StaticRandom,
}

#[derive(Debug, Clone)]
pub struct PacingState {
    pub last_refresh: Option<Instant>,
    pub current_delay: Duration,
    pub bounds: PacingBounds,
}

#[derive(Debug, Clone)]
pub struct PacingDecision {
    /// Delay before jitter.
    pub base: Duration,
    /// Delay to actually sleep.
    pub delay: Duration,
    /// Present when this tick re-measured activity successfully.
    pub sample: Option<ActivitySample>,
}

pub struct PacingController {
    mode: PacingMode,
    state: PacingState,
    rng: fastrand::Rng,
}

impl PacingController {
    pub fn static_random(bounds: PacingBounds) -> Self {
        Self {
            mode: PacingMode::StaticRandom,
            state: PacingState {
                last_refresh: None,
                current_delay: bounds.min(),
                bounds,
            },
            rng: fastrand::Rng::new(),
        }
    }

    pub fn feedback(
        bounds: PacingBounds,
        monitor: Arc<dyn ActivityMonitor>,
        settings: FeedbackSettings,
    ) -> Self {
        Self {
            mode: PacingMode::Feedback { monitor, settings },
            state: PacingState {
                last_refresh: None,
                current_delay: bounds.min(),
                bounds,
            },
            rng: fastrand::Rng::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = fastrand::Rng::with_seed(seed);
        self
    }

    pub fn is_feedback(&self) -> bool {
        matches!(self.mode, PacingMode::Feedback { .. })
    }

    pub async fn next_delay(&mut self) -> PacingDecision {
        self.next_delay_at(Instant::now()).await
    }

    pub async fn next_delay_at(&mut self, now: Instant) -> PacingDecision {
        let Self { mode, state, rng } = self;
        let mut sample = None;

        let base = match mode {
            PacingMode::StaticRandom => {
                let delay = draw_uniform(rng, &state.bounds);
                state.current_delay = delay;
                delay
            }
            PacingMode::Feedback { monitor, settings } => {
                let due = state.last_refresh.map_or(true, |last| {
                    now.saturating_duration_since(last) > settings.refresh_interval
                });

                if due {
                    let (delay, fetched) =
                        measure(monitor.as_ref(), settings, &state.bounds).await;
                    state.current_delay = delay;
                    state.last_refresh = Some(now);
                    sample = fetched;
                }

                state.current_delay
            }
        };

        let delay = add_jitter(rng, base);
        debug!(
            base_ms = base.as_millis() as u64,
            delay_ms = delay.as_millis() as u64,
            "Next noise delay computed"
        );

        PacingDecision {
            base,
            delay,
            sample,
        }
    }
}

async fn measure(
    monitor: &dyn ActivityMonitor,
    settings: &FeedbackSettings,
    bounds: &PacingBounds,
) -> (Duration, Option<ActivitySample>) {
    match monitor
        .fetch_recent_query_count(settings.activity_window)
        .await
    {
        Ok(sample) => {
            match raw_feedback_delay(
                settings.activity_window,
                settings.noise_percentage,
                sample.observed_count,
            ) {
                Some(raw) => {
                    let delay = bounds.clamp(raw);
                    info!(
                        base_ms = delay.as_millis() as u64,
                        raw_ms = raw.as_millis() as u64,
                        queries = sample.observed_count,
                        window_secs = settings.activity_window.as_secs(),
                        "Base sleep time updated from activity"
                    );
                    (delay, Some(sample))
                }
                None => {
                    warn!(
                        host = monitor.host(),
                        "No real traffic observed, using minimum period"
                    );
                    (bounds.min(), Some(sample))
                }
            }
        }
        Err(e) => {
            warn!(
                host = monitor.host(),
                error = %e,
                "Activity unavailable, using minimum period"
            );
            (bounds.min(), None)
        }
    }
}

/// `window × percentage / count`, or `None` without any observed traffic.
pub fn raw_feedback_delay(window: Duration, noise_percentage: u32, count: u64) -> Option<Duration> {
    if count == 0 {
        return None;
    }
    let secs = window.as_secs_f64() * f64::from(noise_percentage) / count as f64;
    Some(Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX))
}

fn draw_uniform(rng: &mut fastrand::Rng, bounds: &PacingBounds) -> Duration {
    let span = bounds.max() - bounds.min();
    bounds.min() + span.mul_f64(rng.f64())
}

fn add_jitter(rng: &mut fastrand::Rng, base: Duration) -> Duration {
    base + base.mul_f64(rng.f64() * MAX_JITTER_FRACTION)
}
