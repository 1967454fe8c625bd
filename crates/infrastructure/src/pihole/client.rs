use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use dns_noise_application::ports::ActivityMonitor;
use dns_noise_domain::{ActivitySample, DomainError};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

/// Column of a query row holding the client host name.
const CLIENT_COLUMN: usize = 3;

/// Body of `api.php?getAllQueries`: one loosely typed array per query,
/// `[timestamp, type, domain, client, ...]`.
#[derive(Debug, Default, Deserialize)]
struct PiholeQueries {
    #[serde(default)]
    data: Vec<Vec<Value>>,
}

/// Counts rows not issued by the noise generator itself.
///
/// Rows whose client column starts with `filter` are excluded. An empty
/// filter counts every row, and rows too short to carry a client column are
/// counted as real traffic.
pub fn count_real_queries(filter: &str, rows: &[Vec<Value>]) -> u64 {
    if filter.is_empty() {
        return rows.len() as u64;
    }

    rows.iter()
        .filter(|row| match row.get(CLIENT_COLUMN).and_then(Value::as_str) {
            Some(client) => !client.starts_with(filter),
            None => true,
        })
        .count() as u64
}

/// Reads recent query activity from a Pi-hole admin API.
pub struct PiholeActivityMonitor {
    http_client: reqwest::Client,
    host: String,
    auth_token: String,
    filter: String,
}

impl PiholeActivityMonitor {
    pub fn new(
        host: impl Into<String>,
        auth_token: impl Into<String>,
        filter: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self, DomainError> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("dns-noise/", env!("CARGO_PKG_VERSION")))
            .timeout(request_timeout)
            .build()
            .map_err(|e| DomainError::ActivityFetch(e.to_string()))?;

        Ok(Self {
            http_client,
            host: host.into(),
            auth_token: auth_token.into(),
            filter: filter.into(),
        })
    }

    fn url(&self, from: i64, until: i64) -> String {
        format!(
            "http://{}/admin/api.php?getAllQueries&from={}&until={}&auth={}",
            self.host, from, until, self.auth_token
        )
    }

    async fn fetch_rows(&self, from: i64, until: i64) -> Result<Vec<Vec<Value>>, DomainError> {
        let response = self
            .http_client
            .get(self.url(from, until))
            .send()
            .await
            .map_err(|e| {
                DomainError::ActivityFetch(format!(
                    "Unable to fetch activity data from '{}': {}",
                    self.host,
                    e.without_url()
                ))
            })?;

        if !response.status().is_success() {
            return Err(DomainError::ActivityFetch(format!(
                "Unexpected status from '{}': HTTP {}",
                self.host,
                response.status().as_u16()
            )));
        }

        let body = response.bytes().await.map_err(|e| {
            DomainError::ActivityFetch(format!(
                "Unable to read response from '{}': {}",
                self.host,
                e.without_url()
            ))
        })?;

        let queries: PiholeQueries = serde_json::from_slice(&body).map_err(|e| {
            DomainError::ActivityFetch(format!(
                "Unable to decode response from '{}': {}",
                self.host, e
            ))
        })?;

        Ok(queries.data)
    }
}

#[async_trait]
impl ActivityMonitor for PiholeActivityMonitor {
    #[instrument(skip(self), fields(host = %self.host))]
    async fn fetch_recent_query_count(
        &self,
        window: Duration,
    ) -> Result<ActivitySample, DomainError> {
        let window_end = Utc::now();
        let span = ChronoDuration::from_std(window)
            .map_err(|e| DomainError::ActivityFetch(format!("Invalid activity window: {}", e)))?;
        let window_start = window_end - span;

        let rows = self
            .fetch_rows(window_start.timestamp(), window_end.timestamp())
            .await?;
        let observed_count = count_real_queries(&self.filter, &rows);

        debug!(
            total = rows.len(),
            observed_count,
            "Retrieved activity from Pi-hole"
        );

        if observed_count == 0 {
            return Err(DomainError::NoActivitySignal {
                host: self.host.clone(),
            });
        }

        Ok(ActivitySample::new(window_start, window_end, observed_count))
    }

    fn host(&self) -> &str {
        &self.host
    }
}
