use chrono::{DateTime, Utc};

/// Real (non-noise) query volume observed over one activity window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivitySample {
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub observed_count: u64,
}

impl ActivitySample {
    pub fn new(window_start: DateTime<Utc>, window_end: DateTime<Utc>, observed_count: u64) -> Self {
        Self {
            window_start,
            window_end,
            observed_count,
        }
    }

    /// Observed queries per second; zero for a degenerate window.
    pub fn rate_per_second(&self) -> f64 {
        let secs = (self.window_end - self.window_start).num_milliseconds() as f64 / 1000.0;
        if secs <= 0.0 {
            return 0.0;
        }
        self.observed_count as f64 / secs
    }
}
