use serde::{Deserialize, Serialize};

use super::{CatalogEntry, Locale, Localized, LocalizedText};
use crate::parsers::features::extract as extract_features;
use crate::parsers::icon::{self, GENERIC_ICON};
use crate::parsers::links::{self, LinkPreview};
use crate::parsers::slug::normalize;

/// The source data never carries a rating; every tool gets this one.
pub const DEFAULT_RATING: u8 = 4;

fn default_rating() -> u8 {
    DEFAULT_RATING
}

fn default_icon() -> String {
    GENERIC_ICON.as_str().to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub id: String,
    pub name: LocalizedText,
    #[serde(default)]
    pub description: LocalizedText,
    #[serde(default)]
    pub category: LocalizedText,
    #[serde(default)]
    pub features: Localized<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<LocalizedText>,
    #[serde(default = "default_rating")]
    pub rating: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tutorial_url: Option<String>,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_internal: Option<bool>,
}

/// Raw column values for one tool, before ids, features and icons are derived.
#[derive(Debug, Clone, Default)]
pub struct ToolDraft {
    pub name: LocalizedText,
    pub description: LocalizedText,
    pub category: LocalizedText,
    pub features_text: LocalizedText,
    pub remarks: LocalizedText,
    pub url: Option<String>,
    pub tutorial_url: Option<String>,
    pub is_internal: Option<bool>,
}

impl Tool {
    /// Builds a record the way the exporter does: id from the English name,
    /// features split out of the free-text columns, icon from the category.
    pub fn new(draft: ToolDraft) -> Self {
        let category_for_icon = if draft.category.en.trim().is_empty() {
            &draft.category.zh
        } else {
            &draft.category.en
        };

        let remarks = if draft.remarks.is_blank() {
            None
        } else {
            Some(draft.remarks)
        };

        Self {
            id: normalize(&draft.name.en),
            features: Localized::new(
                extract_features(Some(&draft.features_text.en)),
                extract_features(Some(&draft.features_text.zh)),
            ),
            icon: icon::resolve(category_for_icon).as_str().to_string(),
            name: draft.name,
            description: draft.description,
            category: draft.category,
            remarks,
            rating: DEFAULT_RATING,
            url: draft.url.filter(|u| !u.trim().is_empty()),
            tutorial_url: draft.tutorial_url.filter(|u| !u.trim().is_empty()),
            is_internal: draft.is_internal,
        }
    }

    pub fn has_tutorial(&self) -> bool {
        !links::is_absent(self.tutorial_url.as_deref())
    }

    pub fn tutorial_preview(&self) -> LinkPreview {
        links::classify(self.tutorial_url.as_deref())
    }

    pub fn link_preview(&self) -> LinkPreview {
        links::classify(self.url.as_deref())
    }
}

impl CatalogEntry for Tool {
    const LIST_FIELD: &'static str = "tools";

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self, locale: Locale) -> &str {
        self.name.text(locale, &self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn draft() -> ToolDraft {
        ToolDraft {
            name: LocalizedText::new("Slack Huddles!".into(), "快速会议".into()),
            description: LocalizedText::new("Quick calls".into(), "快速通话".into()),
            category: LocalizedText::new("Team Communication".into(), "团队沟通".into()),
            features_text: LocalizedText::new("Audio; Screen share, Chat".into(), "语音、共享".into()),
            remarks: LocalizedText::default(),
            url: Some("https://slack.com/huddles".into()),
            tutorial_url: Some("#VALUE!".into()),
            is_internal: None,
        }
    }

    #[test]
    fn new_derives_id_features_icon_and_rating() {
        let tool = Tool::new(draft());
        assert_eq!(tool.id, "slack-huddles");
        assert_eq!(tool.features.en, vec!["Audio", "Screen share", "Chat"]);
        assert_eq!(tool.features.zh, vec!["语音", "共享"]);
        assert_eq!(tool.icon, "MessageSquare");
        assert_eq!(tool.rating, DEFAULT_RATING);
        assert_eq!(tool.remarks, None);
        assert!(!tool.has_tutorial());
    }

    #[test]
    fn deserializes_exporter_output_with_nulls() {
        let json = r#"{
            "id": "kahoot",
            "name": {"zh": "Kahoot", "en": "Kahoot"},
            "description": {"zh": "测验", "en": "Quizzes"},
            "category": {"zh": "游戏", "en": "Gaming"},
            "features": {"zh": [], "en": ["Live quiz"]},
            "remarks": {"zh": "", "en": ""},
            "rating": 4,
            "url": null,
            "tutorialUrl": null,
            "icon": "Gamepad2"
        }"#;
        let tool: Tool = serde_json::from_str(json).unwrap();
        assert_eq!(tool.url, None);
        assert_eq!(tool.tutorial_url, None);
        assert_eq!(tool.is_internal, None);
        assert_eq!(tool.title(Locale::En), "Kahoot");
    }

    #[test]
    fn missing_rating_and_icon_take_defaults() {
        let tool: Tool = serde_json::from_str(r#"{"id":"x","name":{"en":"X"}}"#).unwrap();
        assert_eq!(tool.rating, 4);
        assert_eq!(tool.icon, GENERIC_ICON.as_str());
        assert_eq!(tool.title(Locale::Zh), "X");
    }
}
