use dns_noise_domain::config::SourceConfig;
use dns_noise_domain::validators::is_plausible_domain;
use dns_noise_domain::DomainError;
use std::io::{Cursor, Read};
use std::time::Duration;
use tracing::{debug, instrument};

const FETCH_TIMEOUT: Duration = Duration::from_secs(120);

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Whether a download should be treated as a zip archive.
fn looks_like_zip(url: &str, content_type: Option<&str>, body: &[u8]) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.to_ascii_lowercase().ends_with(".zip")
        || content_type.is_some_and(|ct| ct.contains("zip"))
        || body.starts_with(ZIP_MAGIC)
}

/// Extracts the single CSV member of a zip archive.
///
/// Archives holding more than one member, or a member that is not a
/// `.csv`, are rejected.
pub fn unzip_single_csv(archive: &[u8]) -> Result<String, String> {
    let mut zip = zip::ZipArchive::new(Cursor::new(archive))
        .map_err(|e| format!("unreadable zip archive: {}", e))?;

    if zip.len() != 1 {
        return Err(format!("expected one zipped file, found {}", zip.len()));
    }

    let mut member = zip
        .by_index(0)
        .map_err(|e| format!("unreadable zip member: {}", e))?;

    let name = member.name().to_string();
    if !name.to_ascii_lowercase().ends_with(".csv") {
        return Err(format!("unexpected file format in archive: '{}'", name));
    }

    let mut content = String::new();
    member
        .read_to_string(&mut content)
        .map_err(|e| format!("unable to decompress '{}': {}", name, e))?;

    debug!(member = %name, bytes = content.len(), "Archive extracted");
    Ok(content)
}

/// Extracts one column of a CSV document as domain names.
///
/// Blank or implausible names are skipped, surrounding quotes and a
/// trailing dot are dropped, and rows without the column are ignored.
pub fn parse_csv_column(content: &str, column: usize) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| line.trim_end_matches('\r').split(',').nth(column))
        .map(|field| field.trim().trim_matches('"').trim_end_matches('.'))
        .filter(|name| is_plausible_domain(name))
        .map(str::to_ascii_lowercase)
        .collect()
}

/// Downloads corpus sources over HTTP(S).
pub struct CsvFetcher {
    http_client: reqwest::Client,
}

impl CsvFetcher {
    pub fn new() -> Result<Self, DomainError> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("dns-noise/", env!("CARGO_PKG_VERSION"), " (corpus-sync)"))
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| DomainError::IoError(e.to_string()))?;

        Ok(Self { http_client })
    }

    #[instrument(skip(self, source), fields(label = %source.label))]
    pub async fn fetch(&self, source: &SourceConfig) -> Result<Vec<String>, DomainError> {
        let invalid = |reason: String| DomainError::InvalidSource {
            label: source.label.clone(),
            reason,
        };

        let response = self
            .http_client
            .get(&source.url)
            .send()
            .await
            .map_err(|e| invalid(format!("fetch error for {}: {}", source.url, e)))?;

        if !response.status().is_success() {
            return Err(invalid(format!(
                "HTTP {} for {}",
                response.status().as_u16(),
                source.url
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let body = response
            .bytes()
            .await
            .map_err(|e| invalid(format!("read error for {}: {}", source.url, e)))?;

        let content = if looks_like_zip(&source.url, content_type.as_deref(), &body) {
            tokio::task::spawn_blocking(move || unzip_single_csv(&body))
                .await
                .map_err(|e| invalid(format!("archive task failed: {}", e)))?
                .map_err(invalid)?
        } else {
            String::from_utf8_lossy(&body).into_owned()
        };

        let domains = parse_csv_column(&content, source.column);
        debug!(domains = domains.len(), "Source downloaded");

        if domains.is_empty() {
            return Err(invalid(format!(
                "no domain names found in column {}",
                source.column
            )));
        }

        Ok(domains)
    }
}
