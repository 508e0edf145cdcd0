use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use super::CatalogEntry;
use crate::error::{SourceError, StoreError};

pub const LAST_UPDATED_FIELD: &str = "lastUpdated";

/// A validated feed payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T> {
    pub items: Vec<T>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            last_updated: None,
        }
    }
}

impl<T> Snapshot<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Checks the document shape and pulls out the entity list.
///
/// The payload must be an object holding `T::LIST_FIELD` as an array whose
/// items all deserialize. An empty list is still a valid document; callers
/// decide whether that counts as usable data.
pub fn parse_document<T: CatalogEntry>(value: &Value) -> Result<Snapshot<T>, SourceError> {
    let object = value
        .as_object()
        .ok_or_else(|| SourceError::Malformed(format!("expected an object, found {}", kind_of(value))))?;

    let list = object
        .get(T::LIST_FIELD)
        .ok_or_else(|| SourceError::Malformed(format!("missing `{}` field", T::LIST_FIELD)))?;

    let raw_items = list.as_array().ok_or_else(|| {
        SourceError::Malformed(format!(
            "`{}` is not a list (found {})",
            T::LIST_FIELD,
            kind_of(list)
        ))
    })?;

    let items = raw_items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            serde_json::from_value::<T>(item.clone()).map_err(|e| {
                SourceError::Malformed(format!("`{}`[{}]: {}", T::LIST_FIELD, idx, e))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let last_updated = object
        .get(LAST_UPDATED_FIELD)
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|d| d.with_timezone(&Utc));

    Ok(Snapshot { items, last_updated })
}

/// Builds `{ <list field>: [...], "lastUpdated": "<rfc3339>" }`.
pub fn to_document<T: CatalogEntry>(items: &[T], last_updated: DateTime<Utc>) -> Result<Value, serde_json::Error> {
    let mut document = Map::new();
    document.insert(T::LIST_FIELD.to_string(), serde_json::to_value(items)?);
    document.insert(
        LAST_UPDATED_FIELD.to_string(),
        Value::String(last_updated.to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    Ok(Value::Object(document))
}

/// Replaces the whole snapshot file at `path`. Never patches in place.
pub fn write_snapshot<T: CatalogEntry>(
    path: &Path,
    items: &[T],
    last_updated: DateTime<Utc>,
) -> Result<(), StoreError> {
    let document = to_document(items, last_updated)?;
    let json = serde_json::to_string_pretty(&document)?;

    let tmp = tmp_path(path);
    if let Some(parent) = tmp.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&tmp, json.as_bytes())?;
    fs::rename(&tmp, path)?;

    info!("Wrote {} {} to {}", items.len(), T::LIST_FIELD, path.display());
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut p = path.to_path_buf();
    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("snapshot.json");
    p.set_file_name(format!("{}.tmp", file_name));
    p
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ShowcaseItem, Tool};
    use serde_json::json;

    #[test]
    fn rejects_non_object_payloads() {
        let err = parse_document::<Tool>(&json!([1, 2])).unwrap_err();
        assert!(err.to_string().contains("expected an object"));
    }

    #[test]
    fn rejects_missing_list_field() {
        let err = parse_document::<Tool>(&json!({"showcase": []})).unwrap_err();
        assert!(err.to_string().contains("missing `tools`"));
    }

    #[test]
    fn rejects_list_field_of_wrong_type() {
        let err = parse_document::<ShowcaseItem>(&json!({"showcase": "oops"})).unwrap_err();
        assert!(err.to_string().contains("not a list (found string)"));
    }

    #[test]
    fn rejects_items_that_do_not_deserialize() {
        let err = parse_document::<ShowcaseItem>(&json!({"showcase": [{"id": 3}]})).unwrap_err();
        assert!(matches!(err, SourceError::Malformed(_)));
    }

    #[test]
    fn keeps_timestamp_when_parseable() {
        let snapshot = parse_document::<ShowcaseItem>(&json!({
            "showcase": [],
            "lastUpdated": "2025-03-01T08:30:00.000Z"
        }))
        .unwrap();
        assert!(snapshot.is_empty());
        assert_eq!(
            snapshot.last_updated.map(|d| d.to_rfc3339()),
            Some("2025-03-01T08:30:00+00:00".to_string())
        );

        let undated = parse_document::<ShowcaseItem>(&json!({"showcase": [], "lastUpdated": "yesterday"})).unwrap();
        assert_eq!(undated.last_updated, None);
    }
}
