//! Display strings keyed by locale.
//!
//! A [`Translations`] value is built once and handed to whatever renders.
//! Lookups never fail: an unknown key renders as the key itself.

use std::collections::HashMap;

use crate::models::{Locale, WishStatus};

const BUILTIN: &[(&str, &str, &str)] = &[
    // (key, en, zh)
    ("tools.title", "Tools", "工具"),
    ("tools.internal", "Internal Tools", "内部工具"),
    ("tools.external", "External Tools", "外部工具"),
    ("tools.remarks", "Remarks", "备注"),
    ("tools.tutorial", "Tutorial", "教学视频"),
    ("showcase.title", "Best Practice Showcase", "最佳实践展示"),
    ("showcase.owner", "Owner", "负责人"),
    ("link.comingSoon", "Tutorial video coming soon", "教学视频即将上线"),
    ("link.visit", "Visit", "访问"),
    ("lastUpdated", "Last updated", "最后更新"),
    ("loader.stale", "Showing bundled data; live data could not be loaded", "正在显示内置数据，无法加载最新数据"),
    ("loader.failed", "Could not load data. Try refreshing.", "数据加载失败，请重试"),
    ("wishingPool.title", "Wishing Pool", "许愿池"),
    ("wishingPool.noItems", "No wishes yet", "暂无愿望提交"),
    ("wishingPool.successMessage", "Your wish has been submitted!", "你的愿望已成功提交！"),
    ("wishingPool.error.blank", "Please fill in all fields", "请填写所有字段"),
    ("wishingPool.status.pending", "Pending", "待处理"),
    ("wishingPool.status.approved", "Approved", "已批准"),
    ("wishingPool.status.rejected", "Rejected", "已拒绝"),
];

#[derive(Debug, Clone, Default)]
pub struct Translations {
    tables: HashMap<Locale, HashMap<String, String>>,
}

impl Translations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        let mut translations = Self::new();
        for &(key, en, zh) in BUILTIN {
            translations.insert(Locale::En, key, en);
            translations.insert(Locale::Zh, key, zh);
        }
        translations
    }

    pub fn insert(&mut self, locale: Locale, key: impl Into<String>, value: impl Into<String>) {
        self.tables
            .entry(locale)
            .or_default()
            .insert(key.into(), value.into());
    }

    pub fn t<'a>(&'a self, locale: Locale, key: &'a str) -> &'a str {
        self.tables
            .get(&locale)
            .and_then(|table| table.get(key))
            .map(String::as_str)
            .unwrap_or(key)
    }

    pub fn status_label(&self, locale: Locale, status: WishStatus) -> &str {
        match status {
            WishStatus::Pending => self.t(locale, "wishingPool.status.pending"),
            WishStatus::Approved => self.t(locale, "wishingPool.status.approved"),
            WishStatus::Rejected => self.t(locale, "wishingPool.status.rejected"),
        }
    }
}
