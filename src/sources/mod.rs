use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::error::SourceError;

mod bundled;
mod proxy;
mod remote;

pub use bundled::BundledSnapshot;
pub use proxy::ProxyMirror;
pub use remote::RemoteSnapshot;

/// One origin a loader may pull a snapshot document from.
///
/// Implementations return the raw, unwrapped JSON document; shape validation
/// happens in the loader.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    fn label(&self) -> String;
    async fn fetch(&self, client: &Client) -> Result<Value, SourceError>;
}

pub(crate) fn parse_json(body: &str, origin: &str) -> Result<Value, SourceError> {
    serde_json::from_str(body)
        .map_err(|e| SourceError::Malformed(format!("{} did not return JSON: {}", origin, e)))
}
