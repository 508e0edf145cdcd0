use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::{ProxyConfig, ProxyKind};
use crate::error::SourceError;
use crate::sources::{parse_json, CandidateSource};
use crate::utils::http::{cache_buster, fetch_with_retry, read_body};

/// A CORS mirror relaying the canonical snapshot.
pub struct ProxyMirror {
    name: String,
    kind: ProxyKind,
    endpoint: String,
    target: String,
    retries: u32,
}

#[derive(Debug, Deserialize)]
struct AllOriginsEnvelope {
    contents: Option<String>,
    #[serde(default)]
    status: Option<AllOriginsStatus>,
}

#[derive(Debug, Deserialize)]
struct AllOriginsStatus {
    http_code: Option<i64>,
}

impl ProxyMirror {
    pub fn new(proxy: &ProxyConfig, target: impl Into<String>, retries: u32) -> Self {
        Self {
            name: proxy.name.clone(),
            kind: proxy.kind,
            endpoint: proxy.endpoint.clone(),
            target: target.into(),
            retries,
        }
    }

    fn request_url(&self) -> Result<String, SourceError> {
        match self.kind {
            ProxyKind::AllOrigins => {
                let query = serde_urlencoded::to_string([
                    ("url", self.target.as_str()),
                    ("cache", cache_buster().as_str()),
                ])
                .map_err(|e| SourceError::Malformed(format!("cannot encode proxy query: {}", e)))?;
                let sep = if self.endpoint.contains('?') { '&' } else { '?' };
                Ok(format!("{}{}{}", self.endpoint, sep, query))
            }
            ProxyKind::PlainText => {
                let sep = if self.target.contains('?') { '&' } else { '?' };
                let target = format!("{}{}cache={}", self.target, sep, cache_buster());
                Ok(format!(
                    "{}{}",
                    self.endpoint,
                    utf8_percent_encode(&target, NON_ALPHANUMERIC)
                ))
            }
        }
    }

    fn unwrap_all_origins(&self, body: &str) -> Result<Value, SourceError> {
        let envelope: AllOriginsEnvelope = serde_json::from_str(body)
            .map_err(|e| SourceError::Malformed(format!("{} envelope: {}", self.name, e)))?;

        if let Some(code) = envelope.status.and_then(|s| s.http_code) {
            if code != 200 {
                return Err(SourceError::ProxyStatus {
                    proxy: self.name.clone(),
                    code,
                });
            }
        }

        let contents = envelope
            .contents
            .ok_or_else(|| SourceError::Malformed(format!("{} envelope has no contents", self.name)))?;
        parse_json(&contents, &self.name)
    }
}

#[async_trait]
impl CandidateSource for ProxyMirror {
    fn label(&self) -> String {
        format!("{} proxy", self.name)
    }

    async fn fetch(&self, client: &Client) -> Result<Value, SourceError> {
        let url = self.request_url()?;
        debug!("Requesting {} via {}", self.target, url);

        let response = fetch_with_retry(client, &url, self.retries).await?;
        let body = read_body(response).await?;

        match self.kind {
            ProxyKind::AllOrigins => self.unwrap_all_origins(&body),
            ProxyKind::PlainText => parse_json(&body, &self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mirror(kind: ProxyKind, endpoint: &str) -> ProxyMirror {
        let config = ProxyConfig {
            name: "test".into(),
            kind,
            endpoint: endpoint.into(),
        };
        ProxyMirror::new(&config, "https://host/data/tools.json", 1)
    }

    #[test]
    fn all_origins_url_carries_encoded_target() {
        let url = mirror(ProxyKind::AllOrigins, "https://api.allorigins.win/get")
            .request_url()
            .unwrap();
        assert!(url.starts_with("https://api.allorigins.win/get?url=https%3A%2F%2Fhost%2Fdata%2Ftools.json&cache="));
    }

    #[test]
    fn plain_text_url_appends_encoded_target() {
        let url = mirror(ProxyKind::PlainText, "https://corsproxy.io/?").request_url().unwrap();
        assert!(url.starts_with("https://corsproxy.io/?https%3A%2F%2Fhost%2Fdata%2Ftools%2Ejson%3Fcache%3D"));
    }

    #[test]
    fn all_origins_envelope_is_unwrapped() {
        let proxy = mirror(ProxyKind::AllOrigins, "https://p/get");
        let body = r#"{"contents":"{\"tools\":[]}","status":{"http_code":200}}"#;
        assert_eq!(proxy.unwrap_all_origins(body).unwrap(), serde_json::json!({"tools": []}));
    }

    #[test]
    fn all_origins_upstream_failure_is_reported() {
        let proxy = mirror(ProxyKind::AllOrigins, "https://p/get");
        let body = r#"{"contents":"Not Found","status":{"http_code":404}}"#;
        assert!(matches!(
            proxy.unwrap_all_origins(body),
            Err(SourceError::ProxyStatus { code: 404, .. })
        ));
    }
}
