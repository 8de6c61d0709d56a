/// Splits text into lowercase search terms.
///
/// Terms are runs of alphanumerics plus `+`, `#` and `.`, with dots trimmed
/// from both ends, so `C++`, `C#` and `Node.js` survive while a sentence-final
/// `Go.` becomes `go`.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || matches!(c, '+' | '#' | '.')))
        .map(|piece| piece.trim_matches('.'))
        .filter(|piece| piece.chars().any(char::is_alphanumeric))
        .map(str::to_lowercase)
        .collect()
}

/// Query terms without repeats, in first-seen order.
pub fn query_terms(text: &str) -> Vec<String> {
    let mut terms = tokenize(text);
    let mut seen = std::collections::HashSet::new();
    terms.retain(|t| seen.insert(t.clone()));
    terms
}
