use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::error::SourceError;
use crate::sources::{parse_json, CandidateSource};
use crate::utils::http::{fetch_with_retry, read_body};

/// The canonical hosted snapshot, fetched directly.
pub struct RemoteSnapshot {
    url: String,
    retries: u32,
}

impl RemoteSnapshot {
    pub fn new(url: impl Into<String>, retries: u32) -> Self {
        Self {
            url: url.into(),
            retries,
        }
    }
}

#[async_trait]
impl CandidateSource for RemoteSnapshot {
    fn label(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self, client: &Client) -> Result<Value, SourceError> {
        let response = fetch_with_retry(client, &self.url, self.retries).await?;
        let body = read_body(response).await?;
        debug!("Received {} bytes from {}", body.len(), self.url);
        parse_json(&body, &self.url)
    }
}
