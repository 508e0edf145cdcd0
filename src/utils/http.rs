use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CACHE_CONTROL, PRAGMA};
use reqwest::{Client, ClientBuilder, Response};
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

use crate::config::Config;
use crate::error::SourceError;

pub fn create_client(config: &Config) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    ClientBuilder::new()
        .user_agent(config.user_agent.clone())
        .default_headers(headers)
        .timeout(config.request_timeout())
        .pool_max_idle_per_host(6)
        .build()
}

/// Query value that defeats intermediary caches.
pub fn cache_buster() -> String {
    Utc::now().timestamp_millis().to_string()
}

/// GETs `url` with cache-bypassing headers, retrying with exponential backoff.
///
/// Any non-success status counts as a failed attempt.
pub async fn fetch_with_retry(client: &Client, url: &str, max_retries: u32) -> Result<Response, SourceError> {
    let max_retries = max_retries.max(1);
    let mut attempts = 1;

    loop {
        let error = match client
            .get(url)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => return Ok(response),
            Ok(response) => {
                let status = response.status();
                warn!("HTTP error {}: {}", status, url);
                SourceError::HttpStatus {
                    url: url.to_string(),
                    status: status.as_u16(),
                }
            }
            Err(e) => {
                warn!("Request failed for {}: {}", url, e);
                SourceError::Unreachable {
                    url: url.to_string(),
                    source: e,
                }
            }
        };

        if attempts >= max_retries {
            return Err(error);
        }

        let delay = backoff_delay(attempts);
        warn!("Retrying in {:?}... (attempt {}/{})", delay, attempts + 1, max_retries);
        sleep(delay).await;
        attempts += 1;
    }
}

const MAX_BACKOFF_SECONDS: u64 = 60;

/// 2, 4, 8.. seconds, capped.
fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(2u64.saturating_pow(attempt).min(MAX_BACKOFF_SECONDS))
}

/// Reads a successful response body as text.
pub async fn read_body(response: Response) -> Result<String, SourceError> {
    let url = response.url().to_string();
    response
        .text()
        .await
        .map_err(|source| SourceError::Unreachable { url, source })
}
