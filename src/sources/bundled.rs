use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::borrow::Cow;
use std::path::PathBuf;

use crate::error::SourceError;
use crate::sources::{parse_json, CandidateSource};

/// A snapshot shipped with the application, used when nothing fresher loads.
#[derive(Debug, Clone)]
pub enum BundledSnapshot {
    File(PathBuf),
    Inline { name: String, json: Cow<'static, str> },
}

impl BundledSnapshot {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        BundledSnapshot::File(path.into())
    }

    pub fn inline(name: impl Into<String>, json: impl Into<Cow<'static, str>>) -> Self {
        BundledSnapshot::Inline {
            name: name.into(),
            json: json.into(),
        }
    }

    /// The tools snapshot compiled into the binary.
    pub fn embedded_tools() -> Self {
        Self::inline("bundled tools.json", include_str!("../../data/tools.json"))
    }

    /// The showcase snapshot compiled into the binary.
    pub fn embedded_showcase() -> Self {
        Self::inline("bundled showcase.json", include_str!("../../data/showcase.json"))
    }
}

#[async_trait]
impl CandidateSource for BundledSnapshot {
    fn label(&self) -> String {
        match self {
            BundledSnapshot::File(path) => path.display().to_string(),
            BundledSnapshot::Inline { name, .. } => name.clone(),
        }
    }

    async fn fetch(&self, _client: &Client) -> Result<Value, SourceError> {
        match self {
            BundledSnapshot::File(path) => {
                let body = tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| SourceError::Io {
                        path: path.clone(),
                        source,
                    })?;
                parse_json(&body, &self.label())
            }
            BundledSnapshot::Inline { name, json } => parse_json(json, name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{parse_document, ShowcaseItem, Tool};

    #[test]
    fn embedded_snapshots_are_valid_and_non_empty() {
        let client = Client::new();

        let tools = tokio_test::block_on(BundledSnapshot::embedded_tools().fetch(&client)).unwrap();
        let tools = parse_document::<Tool>(&tools).unwrap();
        assert!(!tools.is_empty());
        assert!(tools.last_updated.is_some());

        let showcase = tokio_test::block_on(BundledSnapshot::embedded_showcase().fetch(&client)).unwrap();
        assert!(!parse_document::<ShowcaseItem>(&showcase).unwrap().is_empty());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let snapshot = BundledSnapshot::from_path("/definitely/not/here.json");
        let err = tokio_test::block_on(snapshot.fetch(&Client::new())).unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
    }
}
