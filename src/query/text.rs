//! Normalized forms of the user's question.

/// A question prepared for detection.
///
/// `folded` is the trimmed, lower-cased input used by regex extractors that need exact
/// substrings (operators, thresholds, letters). `sanitized` additionally drops every
/// character outside `[a-z0-9\s]`, so punctuation never breaks a keyword match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryText {
    pub folded: String,
    pub sanitized: String,
}

impl QueryText {
    pub fn new(raw: &str) -> Self {
        let folded = raw.trim().to_lowercase();
        let sanitized = folded
            .chars()
            .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
            .collect();
        Self { folded, sanitized }
    }

    /// `true` if the sanitized text contains any of `keywords`.
    pub fn mentions_any(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.sanitized.contains(k))
    }
}

#[cfg(test)]
mod tests {
    use super::QueryText;

    #[test]
    fn folds_and_sanitizes() {
        let q = QueryText::new("  How many ROWS?! ");
        assert_eq!(q.folded, "how many rows?!");
        assert_eq!(q.sanitized, "how many rows");
    }

    #[test]
    fn punctuation_does_not_break_keywords() {
        let q = QueryText::new("What's the total (salary)?");
        assert!(q.mentions_any(&["total"]));
        assert!(q.mentions_any(&["whats"]));
        assert!(!q.mentions_any(&["average", "mean"]));
    }

    #[test]
    fn non_ascii_letters_are_dropped_from_sanitized_only() {
        let q = QueryText::new("Café count");
        assert_eq!(q.folded, "café count");
        assert_eq!(q.sanitized, "caf count");
    }
}
