/// Normalize a raw token into an index term: trim whitespace, strip ASCII
/// punctuation from both ends, lowercase. Returns `None` when nothing is left.
pub fn normalize_term(token: &str) -> Option<String> {
    let stripped = token.trim().trim_matches(|c: char| c.is_ascii_punctuation());
    if stripped.is_empty() {
        return None;
    }
    Some(stripped.to_lowercase())
}

/// Split a query into raw terms. Lowercasing is the caller's job and
/// punctuation is left as typed.
pub fn query_terms(query: &str) -> Vec<&str> {
    query.split_whitespace().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation_and_lowercases() {
        assert_eq!(normalize_term("\"Hello,"), Some("hello".to_string()));
        assert_eq!(normalize_term("--"), None);
        assert_eq!(normalize_term("don't!"), Some("don't".to_string()));
    }

    #[test]
    fn query_terms_keep_punctuation() {
        assert_eq!(query_terms("  apple,  Ball "), vec!["apple,", "Ball"]);
    }
}
