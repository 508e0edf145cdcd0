pub mod locale;
pub mod showcase;
pub mod snapshot;
pub mod tool;
pub mod wish;

pub use locale::*;
pub use showcase::*;
pub use snapshot::*;
pub use tool::*;
pub use wish::*;

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An entity type served by a catalog feed.
pub trait CatalogEntry: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Name of the list field in the snapshot document (`tools`, `showcase`).
    const LIST_FIELD: &'static str;

    fn id(&self) -> &str;
    fn title(&self, locale: Locale) -> &str;
}

/// Spreadsheet cells export serial labels as either numbers or strings.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(de::Error::custom(format!(
            "expected string or number, found {}",
            other
        ))),
    }
}
