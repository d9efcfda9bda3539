//! Text canonicalization applied before any answer comparison.

/// Canonicalize raw learner or reference text for comparison.
///
/// Lowercases, drops every character that is not alphanumeric, whitespace,
/// an apostrophe or a hyphen, then collapses whitespace runs to a single
/// space with no leading or trailing whitespace. Never fails; the empty
/// string normalizes to itself.
pub fn normalize(text: &str) -> String {
    let kept: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '\'' || *c == '-')
        .collect();

    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split normalized text into word tokens.
pub fn words(text: &str) -> Vec<String> {
    normalize(text)
        .split(' ')
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}
