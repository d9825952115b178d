use serde::{Deserialize, Serialize};

/// Stable document key, the source path for file-backed corpora.
pub type DocKey = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub key: DocKey,
    pub title: String,
    /// Raw whitespace-delimited tokens from every line after the title.
    pub body: Vec<String>,
}

impl Document {
    /// Split raw text into title (first line, trimmed) and body tokens.
    pub fn parse(key: impl Into<DocKey>, text: &str) -> Self {
        let mut lines = text.lines();
        let title = lines.next().unwrap_or_default().trim().to_string();
        let body = lines
            .flat_map(str::split_whitespace)
            .map(str::to_string)
            .collect();
        Self { key: key.into(), title, body }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_first_line_only() {
        let doc = Document::parse("a.txt", "  File 1 Title \napple ball\n\ncarrot\n");
        assert_eq!(doc.title, "File 1 Title");
        assert_eq!(doc.body, vec!["apple", "ball", "carrot"]);
    }

    #[test]
    fn empty_text() {
        let doc = Document::parse("e.txt", "");
        assert_eq!(doc.title, "");
        assert!(doc.body.is_empty());
    }
}
