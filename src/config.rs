use ::config::{Environment, File};
use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::Locale;
use crate::wishing_pool::DEFAULT_STORAGE_KEY;

const CANONICAL_BASE: &str = "https://raw.githubusercontent.com/Garena544/garena-ld-tools/main/src/data";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub locale: Locale,
    pub user_agent: String,
    pub request_timeout_seconds: u64,
    /// Upper bound for one candidate source, retries included.
    pub candidate_timeout_seconds: u64,
    pub retries_per_source: u32,
    /// 0 runs a single load and exits.
    pub refresh_interval_seconds: u64,
    #[serde(deserialize_with = "tools_feed")]
    pub tools: FeedConfig,
    #[serde(deserialize_with = "showcase_feed")]
    pub showcase: FeedConfig,
    /// Tried in order after the canonical URL.
    pub proxies: Vec<ProxyConfig>,
    pub wishing_pool: WishingPoolConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    pub canonical_url: String,
    /// Overrides the snapshot compiled into the binary.
    pub bundled_path: Option<PathBuf>,
}

impl FeedConfig {
    fn hosted(file: &str) -> Self {
        Self {
            canonical_url: format!("{}/{}", CANONICAL_BASE, file),
            bundled_path: None,
        }
    }
}

// A feed table may set only some keys; the rest keep the hosted defaults.
#[derive(Deserialize)]
struct PartialFeed {
    canonical_url: Option<String>,
    bundled_path: Option<PathBuf>,
}

impl PartialFeed {
    fn over(self, defaults: FeedConfig) -> FeedConfig {
        FeedConfig {
            canonical_url: self.canonical_url.unwrap_or(defaults.canonical_url),
            bundled_path: self.bundled_path.or(defaults.bundled_path),
        }
    }
}

fn tools_feed<'de, D: Deserializer<'de>>(deserializer: D) -> Result<FeedConfig, D::Error> {
    Ok(PartialFeed::deserialize(deserializer)?.over(FeedConfig::hosted("tools.json")))
}

fn showcase_feed<'de, D: Deserializer<'de>>(deserializer: D) -> Result<FeedConfig, D::Error> {
    Ok(PartialFeed::deserialize(deserializer)?.over(FeedConfig::hosted("showcase.json")))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProxyKind {
    /// `GET {endpoint}?url=..` answering `{ "contents": "<json>", "status": {..} }`.
    AllOrigins,
    /// `GET {endpoint}{percent-encoded url}` answering the document verbatim.
    PlainText,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    pub name: String,
    pub kind: ProxyKind,
    pub endpoint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WishingPoolConfig {
    pub db_path: PathBuf,
    pub storage_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            user_agent: concat!("ld-catalog/", env!("CARGO_PKG_VERSION")).to_string(),
            request_timeout_seconds: 25,
            candidate_timeout_seconds: 10,
            retries_per_source: 1,
            refresh_interval_seconds: 300,
            tools: FeedConfig::hosted("tools.json"),
            showcase: FeedConfig::hosted("showcase.json"),
            proxies: vec![
                ProxyConfig {
                    name: "allorigins".to_string(),
                    kind: ProxyKind::AllOrigins,
                    endpoint: "https://api.allorigins.win/get".to_string(),
                },
                ProxyConfig {
                    name: "corsproxy".to_string(),
                    kind: ProxyKind::PlainText,
                    endpoint: "https://corsproxy.io/?".to_string(),
                },
            ],
            wishing_pool: WishingPoolConfig::default(),
        }
    }
}

impl Default for WishingPoolConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("ld_catalog.db"),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl Config {
    /// Defaults, then `catalog.toml` (or `path`), then `CATALOG__*` env vars.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name("catalog").required(false),
        };

        let settings = ::config::Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix("CATALOG").separator("__"))
            .build()
            .context("Failed to read configuration")?;

        settings
            .try_deserialize()
            .context("Invalid configuration")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn candidate_timeout(&self) -> Duration {
        Duration::from_secs(self.candidate_timeout_seconds)
    }
}
