//! Recently used search terms.

/// Maximum number of remembered searches.
pub const HISTORY_CAP: usize = 10;

/// Distinct search terms, most recent first, never longer than
/// [`HISTORY_CAP`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchHistory {
    terms: Vec<String>,
}

impl SearchHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds history from persisted terms, dropping blanks and duplicates
    /// and enforcing the cap.
    #[must_use]
    pub fn from_persisted(terms: &[String]) -> Self {
        let mut history = Self::new();
        for term in terms.iter().rev() {
            history.record(term);
        }
        history
    }

    /// Records a successful search.
    ///
    /// A term already present moves to the front. Returns `false` for blank
    /// terms, which are never stored.
    ///
    /// # Examples
    ///
    /// ```
    /// use dashview::app::history::SearchHistory;
    ///
    /// let mut history = SearchHistory::new();
    /// history.record("bank");
    /// history.record("mail");
    /// history.record("bank");
    /// assert_eq!(history.terms(), ["bank", "mail"]);
    /// ```
    pub fn record(&mut self, term: &str) -> bool {
        let term = term.trim();
        if term.is_empty() {
            return false;
        }
        self.terms.retain(|t| t != term);
        self.terms.insert(0, term.to_string());
        self.terms.truncate(HISTORY_CAP);
        true
    }

    pub fn clear(&mut self) {
        self.terms.clear();
    }

    #[must_use]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eleventh_term_evicts_the_oldest() {
        let mut history = SearchHistory::new();
        for i in 0..=HISTORY_CAP {
            history.record(&format!("term{i}"));
        }
        assert_eq!(history.len(), HISTORY_CAP);
        assert_eq!(history.terms()[0], "term10");
        assert!(!history.terms().contains(&"term0".to_string()));
    }

    #[test]
    fn repeated_term_moves_to_front_without_growing() {
        let mut history = SearchHistory::new();
        history.record("a");
        history.record("b");
        history.record("c");
        history.record("a");
        assert_eq!(history.terms(), ["a", "c", "b"]);
    }

    #[test]
    fn blank_terms_are_ignored() {
        let mut history = SearchHistory::new();
        assert!(!history.record("   "));
        assert!(history.record("  bank "));
        assert_eq!(history.terms(), ["bank"]);
    }

    #[test]
    fn persisted_history_is_sanitized() {
        let raw: Vec<String> = ["a", "b", "a", ""]
            .iter()
            .map(ToString::to_string)
            .chain((0..20).map(|i| format!("x{i}")))
            .collect();
        let history = SearchHistory::from_persisted(&raw);
        assert_eq!(history.len(), HISTORY_CAP);
        assert_eq!(&history.terms()[..2], ["a", "b"]);
    }
}
