//! Data core of the Learning & Development tools catalog: feed loading with
//! source fallback, link classification, and the local wishing pool.

pub mod config;
pub mod error;
pub mod i18n;
pub mod loader;
pub mod models;
pub mod parsers;
pub mod sources;
pub mod storage;
pub mod utils;
pub mod wishing_pool;

pub use error::{SourceError, StoreError, WishError};
pub use loader::{DataLoader, LoadPhase, LoadState};
pub use wishing_pool::WishingPool;
