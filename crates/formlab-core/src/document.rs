//! Plain-text reference documents (already extracted from PDF or similar).

use serde::Serialize;

/// Maximum number of hits returned by [`TextDocument::search`].
pub const MAX_HITS: usize = 30;

/// Characters of each document included in assistant prompts.
pub const PROMPT_EXCERPT_CHARS: usize = 3000;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextDocument {
    pub name: String,
    pub text: String,
}

/// One matching line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineHit {
    /// 1-based line number in the document.
    pub line_number: usize,
    pub line: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub keyword: String,
    /// Number of matching lines, including those past the hit cap.
    pub total: usize,
    pub hits: Vec<LineHit>,
}

impl TextDocument {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// The first `max_chars` characters, never splitting a code point.
    pub fn truncated(&self, max_chars: usize) -> &str {
        match self.text.char_indices().nth(max_chars) {
            Some((idx, _)) => &self.text[..idx],
            None => &self.text,
        }
    }

    /// Case-insensitive line search. Lines are trimmed; at most [`MAX_HITS`]
    /// are returned.
    pub fn search(&self, keyword: &str) -> SearchResult {
        let needle = keyword.trim().to_lowercase();
        let mut total = 0;
        let mut hits = Vec::new();
        if !needle.is_empty() {
            for (i, line) in self.text.lines().enumerate() {
                if line.to_lowercase().contains(&needle) {
                    total += 1;
                    if hits.len() < MAX_HITS {
                        hits.push(LineHit {
                            line_number: i + 1,
                            line: line.trim().to_string(),
                        });
                    }
                }
            }
        }
        SearchResult {
            keyword: keyword.trim().to_string(),
            total,
            hits,
        }
    }

    /// Lines around a 1-based `line_number`: one before, two after.
    pub fn context(&self, line_number: usize) -> Vec<&str> {
        let lines: Vec<&str> = self.text.lines().collect();
        let idx = line_number.saturating_sub(1);
        let start = idx.saturating_sub(1);
        let end = (idx + 3).min(lines.len());
        if start >= end {
            return Vec::new();
        }
        lines[start..end].to_vec()
    }

    /// Block used when quoting this document in a prompt.
    pub fn prompt_block(&self) -> String {
        format!("[document: {}]\n{}", self.name, self.truncated(PROMPT_EXCERPT_CHARS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn truncation_respects_char_boundaries() {
        let doc = TextDocument::new("d", "살균 공정");
        assert_eq!(doc.truncated(2), "살균");
        assert_eq!(doc.truncated(100), "살균 공정");
    }

    #[test]
    fn search_is_case_insensitive_and_trims() {
        let doc = TextDocument::new("d", "Intro\n  Pasteurize at 72C  \nfill\nPASTEURIZE again");
        let result = doc.search("pasteurize");
        assert_eq!(result.total, 2);
        assert_eq!(
            result.hits,
            vec![
                LineHit {
                    line_number: 2,
                    line: "Pasteurize at 72C".into()
                },
                LineHit {
                    line_number: 4,
                    line: "PASTEURIZE again".into()
                },
            ]
        );
    }

    #[test]
    fn hits_are_capped_but_total_is_not() {
        let text = "ccp\n".repeat(45);
        let result = TextDocument::new("d", text).search("CCP");
        assert_eq!(result.total, 45);
        assert_eq!(result.hits.len(), MAX_HITS);
    }

    #[test]
    fn blank_keyword_matches_nothing() {
        let result = TextDocument::new("d", "a\nb").search("  ");
        assert_eq!(result.total, 0);
    }

    #[test]
    fn context_window() {
        let doc = TextDocument::new("d", "a\nb\nc\nd\ne");
        assert_eq!(doc.context(1), vec!["a", "b", "c"]);
        assert_eq!(doc.context(3), vec!["b", "c", "d", "e"]);
        assert!(doc.context(9).is_empty());
    }
}
