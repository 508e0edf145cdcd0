use std::fmt;

/// Symbolic icon names understood by the front end's icon set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
    BookOpen,
    MessageSquare,
    Video,
    BarChart3,
    Users,
    Calendar,
    Monitor,
    Gamepad2,
    Brain,
    Presentation,
}

/// Used when no keyword matches. The exporter has always written `Monitor`.
pub const GENERIC_ICON: Icon = Icon::Monitor;

impl Icon {
    pub fn as_str(&self) -> &'static str {
        match self {
            Icon::BookOpen => "BookOpen",
            Icon::MessageSquare => "MessageSquare",
            Icon::Video => "Video",
            Icon::BarChart3 => "BarChart3",
            Icon::Users => "Users",
            Icon::Calendar => "Calendar",
            Icon::Monitor => "Monitor",
            Icon::Gamepad2 => "Gamepad2",
            Icon::Brain => "Brain",
            Icon::Presentation => "Presentation",
        }
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// Evaluated top to bottom; the first keyword found in the input wins.
const ICON_KEYWORDS: &[(&str, Icon)] = &[
    ("learning", Icon::BookOpen),
    ("education", Icon::BookOpen),
    ("communication", Icon::MessageSquare),
    ("video", Icon::Video),
    ("conference", Icon::Video),
    ("analytics", Icon::BarChart3),
    ("data", Icon::BarChart3),
    ("collaboration", Icon::Users),
    ("team", Icon::Users),
    ("scheduling", Icon::Calendar),
    ("calendar", Icon::Calendar),
    ("development", Icon::Monitor),
    ("coding", Icon::Monitor),
    ("gaming", Icon::Gamepad2),
    ("game", Icon::Gamepad2),
    ("management", Icon::Brain),
    ("assessment", Icon::Brain),
    ("training", Icon::Presentation),
    ("course", Icon::Presentation),
    ("design", Icon::Presentation),
    ("学习", Icon::BookOpen),
    ("教育", Icon::BookOpen),
    ("沟通", Icon::MessageSquare),
    ("交流", Icon::MessageSquare),
    ("视频", Icon::Video),
    ("会议", Icon::Video),
    ("分析", Icon::BarChart3),
    ("数据", Icon::BarChart3),
    ("协作", Icon::Users),
    ("团队", Icon::Users),
    ("日程", Icon::Calendar),
    ("排程", Icon::Calendar),
    ("开发", Icon::Monitor),
    ("编程", Icon::Monitor),
    ("游戏", Icon::Gamepad2),
    ("管理", Icon::Brain),
    ("评估", Icon::Brain),
    ("培训", Icon::Presentation),
    ("课程", Icon::Presentation),
    ("设计", Icon::Presentation),
];

/// Maps a category or type label to an icon. Never fails.
pub fn resolve(category: &str) -> Icon {
    let lowered = category.to_lowercase();
    if lowered.trim().is_empty() {
        return GENERIC_ICON;
    }

    ICON_KEYWORDS
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|&(_, icon)| icon)
        .unwrap_or(GENERIC_ICON)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_english_keywords() {
        assert_eq!(resolve("Team Collaboration Tool"), Icon::Users);
        assert_eq!(resolve("Video Conference"), Icon::Video);
        assert_eq!(resolve("E-Learning Platform"), Icon::BookOpen);
    }

    #[test]
    fn matches_chinese_keywords() {
        assert_eq!(resolve("团队协作"), Icon::Users);
        assert_eq!(resolve("在线课程"), Icon::Presentation);
    }

    #[test]
    fn is_case_insensitive() {
        assert_eq!(resolve("DATA ANALYTICS"), resolve("data analytics"));
        assert_eq!(resolve("GAMING"), Icon::Gamepad2);
    }

    #[test]
    fn table_order_breaks_ties() {
        // "communication" precedes "team" in the table.
        assert_eq!(resolve("Team Communication"), Icon::MessageSquare);
        // "data" precedes "management".
        assert_eq!(resolve("Data Management"), Icon::BarChart3);
    }

    #[test]
    fn empty_or_unknown_is_generic() {
        assert_eq!(resolve(""), GENERIC_ICON);
        assert_eq!(resolve("   "), GENERIC_ICON);
        assert_eq!(resolve("Miscellaneous"), GENERIC_ICON);
    }
}
