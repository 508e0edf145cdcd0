/// Pieces this long are paragraphs that slipped through, not features.
const MAX_FEATURE_CHARS: usize = 100;
const MAX_FEATURES: usize = 4;

fn is_separator(c: char) -> bool {
    matches!(c, ';' | ',' | '\n' | '、')
}

/// Splits a free-text "main functions" cell into at most four short features.
pub fn extract(text: Option<&str>) -> Vec<String> {
    let Some(text) = text else {
        return Vec::new();
    };

    text.split(is_separator)
        .map(str::trim)
        .filter(|piece| !piece.is_empty() && piece.chars().count() < MAX_FEATURE_CHARS)
        .take(MAX_FEATURES)
        .map(str::to_string)
        .collect()
}
