use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Display language. `Zh` is the primary locale, `En` the secondary one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Zh,
    En,
}

impl Locale {
    pub fn key(&self) -> &'static str {
        match self {
            Locale::Zh => "zh",
            Locale::En => "en",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_lowercase().as_str() {
            "zh" | "zh-cn" | "cn" => Some(Locale::Zh),
            "en" | "en-us" | "en-gb" => Some(Locale::En),
            _ => None,
        }
    }

    pub fn other(self) -> Self {
        match self {
            Locale::Zh => Locale::En,
            Locale::En => Locale::Zh,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locale::from_key(s).ok_or_else(|| format!("unsupported locale `{}` (expected en or zh)", s))
    }
}

/// A value carried in both display languages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de> + Default"))]
pub struct Localized<T> {
    #[serde(default)]
    pub en: T,
    #[serde(default)]
    pub zh: T,
}

pub type LocalizedText = Localized<String>;

impl<T> Localized<T> {
    pub fn new(en: T, zh: T) -> Self {
        Self { en, zh }
    }

    pub fn get(&self, locale: Locale) -> &T {
        match locale {
            Locale::En => &self.en,
            Locale::Zh => &self.zh,
        }
    }
}

impl Localized<String> {
    /// Text for `locale`, then the other locale, then `key`. Never blank.
    pub fn text<'a>(&'a self, locale: Locale, key: &'a str) -> &'a str {
        [self.get(locale), self.get(locale.other())]
            .into_iter()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .unwrap_or(key)
    }

    pub fn is_blank(&self) -> bool {
        self.en.trim().is_empty() && self.zh.trim().is_empty()
    }
}
