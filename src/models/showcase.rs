use serde::{Deserialize, Serialize};

use super::{string_or_number, CatalogEntry, Locale};
use crate::parsers::links::{self, LinkPreview};
use crate::parsers::slug::normalize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowcaseItem {
    pub id: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub sn: String,
    /// Owner of the example.
    #[serde(default)]
    pub pic: String,
    pub showcase: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl ShowcaseItem {
    pub fn new(sn: impl Into<String>, pic: impl Into<String>, showcase: impl Into<String>, link: Option<String>) -> Self {
        let showcase = showcase.into();
        Self {
            id: normalize(&showcase),
            sn: sn.into(),
            pic: pic.into(),
            showcase,
            link,
        }
    }

    pub fn link_preview(&self) -> LinkPreview {
        links::classify(self.link.as_deref())
    }
}

impl CatalogEntry for ShowcaseItem {
    const LIST_FIELD: &'static str = "showcase";

    fn id(&self) -> &str {
        &self.id
    }

    // Showcase text is single-language in the source sheet.
    fn title(&self, _locale: Locale) -> &str {
        if self.showcase.trim().is_empty() {
            &self.id
        } else {
            &self.showcase
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serial_accepts_numbers_and_strings() {
        let numeric: ShowcaseItem =
            serde_json::from_str(r#"{"id":"a","sn":7,"pic":"Ann","showcase":"A","link":""}"#).unwrap();
        assert_eq!(numeric.sn, "7");

        let text: ShowcaseItem =
            serde_json::from_str(r#"{"id":"b","sn":"007","pic":"Bo","showcase":"B"}"#).unwrap();
        assert_eq!(text.sn, "007");
        assert_eq!(text.link, None);
    }

    #[test]
    fn new_derives_id_from_showcase_text() {
        let item = ShowcaseItem::new("001", "Alice", "AI Onboarding Buddy (v2)", None);
        assert_eq!(item.id, "ai-onboarding-buddy-v2");
        assert_eq!(item.link_preview(), LinkPreview::Unavailable);
    }
}
