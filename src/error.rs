use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Why a candidate source did not yield usable data.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request to {url} failed: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("proxy {proxy} reported upstream status {code}")]
    ProxyStatus { proxy: String, code: i64 },

    #[error("malformed payload: {0}")]
    Malformed(String),

    #[error("source returned an empty `{0}` list")]
    Empty(&'static str),

    #[error("could not read snapshot {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage lock poisoned")]
    Poisoned,
}

#[derive(Debug, Error)]
pub enum WishError {
    #[error("{0} must not be blank")]
    BlankField(&'static str),

    #[error(transparent)]
    Store(#[from] StoreError),
}
