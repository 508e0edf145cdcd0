use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::debug;

mod narration;

use crate::config::{Config, FeedConfig};
use crate::error::SourceError;
use crate::models::{parse_document, CatalogEntry, ShowcaseItem, Snapshot, Tool};
use crate::sources::{BundledSnapshot, CandidateSource, ProxyMirror, RemoteSnapshot};
use narration::Narration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    Loading,
    Ready,
    /// Ready, but serving the bundled snapshot because nothing fresher loaded.
    ReadyStale,
}

#[derive(Debug, Clone)]
pub struct LoadState<T> {
    pub phase: LoadPhase,
    pub snapshot: Snapshot<T>,
    /// Label of the source the snapshot came from.
    pub source: Option<String>,
    /// Set only when every source, bundled included, came up empty.
    pub error: Option<String>,
    pub narration: Vec<String>,
}

impl<T> LoadState<T> {
    fn idle() -> Self {
        Self {
            phase: LoadPhase::Idle,
            snapshot: Snapshot::default(),
            source: None,
            error: None,
            narration: Vec::new(),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.snapshot.items
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn is_stale(&self) -> bool {
        self.phase == LoadPhase::ReadyStale
    }
}

struct LoaderInner {
    client: Client,
    candidates: Vec<Box<dyn CandidateSource>>,
    bundled: Option<BundledSnapshot>,
    candidate_timeout: Duration,
}

/// Loads one catalog feed, trying each candidate source strictly in order.
///
/// A finished load replaces the whole state at once. Overlapping refreshes
/// are not deduplicated; whichever finishes last wins.
pub struct DataLoader<T> {
    inner: Arc<LoaderInner>,
    state: Arc<RwLock<LoadState<T>>>,
}

pub type ToolsLoader = DataLoader<Tool>;
pub type ShowcaseLoader = DataLoader<ShowcaseItem>;

pub fn tools_loader(config: &Config, client: Client) -> ToolsLoader {
    DataLoader::from_feed(config, &config.tools, BundledSnapshot::embedded_tools(), client)
}

pub fn showcase_loader(config: &Config, client: Client) -> ShowcaseLoader {
    DataLoader::from_feed(config, &config.showcase, BundledSnapshot::embedded_showcase(), client)
}

impl<T: CatalogEntry> DataLoader<T> {
    pub fn new(
        client: Client,
        candidates: Vec<Box<dyn CandidateSource>>,
        bundled: Option<BundledSnapshot>,
        candidate_timeout: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(LoaderInner {
                client,
                candidates,
                bundled,
                candidate_timeout,
            }),
            state: Arc::new(RwLock::new(LoadState::idle())),
        }
    }

    /// Canonical URL first, then each configured proxy, bundled snapshot last.
    pub fn from_feed(config: &Config, feed: &FeedConfig, embedded: BundledSnapshot, client: Client) -> Self {
        let retries = config.retries_per_source;

        let mut candidates: Vec<Box<dyn CandidateSource>> =
            vec![Box::new(RemoteSnapshot::new(feed.canonical_url.clone(), retries))];
        for proxy in &config.proxies {
            candidates.push(Box::new(ProxyMirror::new(proxy, feed.canonical_url.clone(), retries)));
        }

        let bundled = feed
            .bundled_path
            .clone()
            .map(BundledSnapshot::from_path)
            .unwrap_or(embedded);

        Self::new(client, candidates, Some(bundled), config.candidate_timeout())
    }

    pub async fn state(&self) -> LoadState<T> {
        self.state.read().await.clone()
    }

    pub async fn load(&self) -> LoadState<T> {
        self.refresh().await
    }

    /// Re-runs the whole fallback chain and stores the result.
    pub async fn refresh(&self) -> LoadState<T> {
        self.state.write().await.phase = LoadPhase::Loading;
        let next = self.inner.run::<T>().await;
        *self.state.write().await = next.clone();
        next
    }

    /// Runs a refresh on the runtime without keeping the loader alive.
    ///
    /// If the loader is dropped before the load finishes, the result is
    /// discarded.
    pub fn spawn_refresh(&self) -> JoinHandle<()> {
        let inner = Arc::clone(&self.inner);
        let state = Arc::downgrade(&self.state);

        tokio::spawn(async move {
            if let Some(state) = state.upgrade() {
                state.write().await.phase = LoadPhase::Loading;
            }

            let next = inner.run::<T>().await;

            match state.upgrade() {
                Some(state) => *state.write().await = next,
                None => debug!("Loader dropped before {} load finished; discarding result", T::LIST_FIELD),
            }
        })
    }
}

impl LoaderInner {
    async fn run<T: CatalogEntry>(&self) -> LoadState<T> {
        let mut narration = Narration::default();
        let total = self.candidates.len();
        narration.info(format!("Loading {} from {} candidate source(s)", T::LIST_FIELD, total));

        for (idx, source) in self.candidates.iter().enumerate() {
            let label = source.label();
            narration.info(format!("Trying source {}/{}: {}", idx + 1, total, label));

            match self.try_source::<T>(source.as_ref()).await {
                Ok(snapshot) => {
                    narration.info(format!("Loaded {} {} from {}", snapshot.len(), T::LIST_FIELD, label));
                    note_freshness(&mut narration, &snapshot);
                    return LoadState {
                        phase: LoadPhase::Ready,
                        snapshot,
                        source: Some(label),
                        error: None,
                        narration: narration.into_lines(),
                    };
                }
                Err(e) => narration.warn(format!("Source {}/{} ({}) failed: {}", idx + 1, total, label, e)),
            }
        }

        if let Some(bundled) = &self.bundled {
            let label = bundled.label();
            match self.try_source::<T>(bundled).await {
                Ok(snapshot) => {
                    narration.warn(format!(
                        "No remote source usable; serving {} {} from {} (may be stale)",
                        snapshot.len(),
                        T::LIST_FIELD,
                        label
                    ));
                    note_freshness(&mut narration, &snapshot);
                    return LoadState {
                        phase: LoadPhase::ReadyStale,
                        snapshot,
                        source: Some(label),
                        error: None,
                        narration: narration.into_lines(),
                    };
                }
                Err(e) => narration.warn(format!("Bundled snapshot {} unusable: {}", label, e)),
            }
        }

        let error = format!("No usable {} data from any source", T::LIST_FIELD);
        narration.warn(error.clone());
        LoadState {
            phase: LoadPhase::Ready,
            snapshot: Snapshot::default(),
            source: None,
            error: Some(error),
            narration: narration.into_lines(),
        }
    }

    async fn try_source<T: CatalogEntry>(&self, source: &dyn CandidateSource) -> Result<Snapshot<T>, SourceError> {
        let value = timeout(self.candidate_timeout, source.fetch(&self.client))
            .await
            .map_err(|_| SourceError::Timeout(self.candidate_timeout))??;

        let snapshot = parse_document::<T>(&value)?;
        if snapshot.is_empty() {
            return Err(SourceError::Empty(T::LIST_FIELD));
        }
        Ok(snapshot)
    }
}

fn note_freshness<T>(narration: &mut Narration, snapshot: &Snapshot<T>) {
    match snapshot.last_updated {
        Some(ts) => narration.info(format!("Data last updated {}", ts.to_rfc3339())),
        None => narration.warn("Payload has no usable lastUpdated timestamp"),
    }
}
