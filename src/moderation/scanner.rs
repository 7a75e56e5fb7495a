//! Forbidden term detection
//!
//! Matching is a case-insensitive substring search. A term hidden inside a
//! longer word still matches; surrounding spaces in a configured term are
//! kept, so `" word "` only matches the standalone word.

/// Scans message text against an ordered list of forbidden terms
#[derive(Debug, Clone, Default)]
pub struct ContentScanner {
    /// Lowercased terms in configured order
    terms: Vec<String>,
}

impl ContentScanner {
    /// Create a scanner; empty terms are dropped, padding is kept
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms = terms
            .into_iter()
            .map(|term| term.as_ref().to_lowercase())
            .filter(|term| !term.is_empty())
            .collect();
        Self { terms }
    }

    /// Return the first configured term found in `text`
    #[must_use]
    pub fn scan(&self, text: &str) -> Option<&str> {
        if text.is_empty() {
            return None;
        }

        let text_lower = text.to_lowercase();
        self.terms
            .iter()
            .find(|term| text_lower.contains(term.as_str()))
            .map(String::as_str)
    }

    /// Number of configured terms
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
