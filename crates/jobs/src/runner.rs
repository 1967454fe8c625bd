use crate::{NoiseLoopJob, NoiseLoopSummary};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Starts the background jobs under one shutdown token.
///
/// ```rust,ignore
/// let running = JobRunner::new()
///     .with_noise_loop(job)
///     .start();
/// tokio::signal::ctrl_c().await?;
/// running.shutdown().await;
/// ```
pub struct JobRunner {
    noise_loop: Option<NoiseLoopJob>,
    shutdown: CancellationToken,
}

impl JobRunner {
    pub fn new() -> Self {
        Self {
            noise_loop: None,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn with_noise_loop(mut self, job: NoiseLoopJob) -> Self {
        self.noise_loop = Some(job);
        self
    }

    pub fn start(self) -> RunningJobs {
        info!("Starting background job runner");

        let noise_loop = self
            .noise_loop
            .map(|job| job.with_cancellation(self.shutdown.child_token()).start());

        RunningJobs {
            noise_loop,
            shutdown: self.shutdown,
        }
    }
}

impl Default for JobRunner {
    fn default() -> Self {
        Self::new()
    }
}

pub struct RunningJobs {
    noise_loop: Option<JoinHandle<NoiseLoopSummary>>,
    shutdown: CancellationToken,
}

impl RunningJobs {
    /// Cancels every job and waits for them to stop.
    pub async fn shutdown(self) -> Option<NoiseLoopSummary> {
        self.shutdown.cancel();
        self.wait().await
    }

    /// Waits for the jobs without cancelling them.
    pub async fn wait(self) -> Option<NoiseLoopSummary> {
        let handle = self.noise_loop?;
        match handle.await {
            Ok(summary) => Some(summary),
            Err(e) => {
                error!(error = %e, "Noise loop task failed");
                None
            }
        }
    }
}
