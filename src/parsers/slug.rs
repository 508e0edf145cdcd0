/// Turns display text into a URL/DOM-safe identifier.
///
/// Lowercases, drops everything outside `[a-z0-9]` and whitespace, then joins
/// the remaining words with single hyphens. Garbage input yields an empty
/// string, which callers must treat as "no stable id".
pub fn normalize(text: &str) -> String {
    let kept: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();

    kept.split_whitespace().collect::<Vec<_>>().join("-")
}
