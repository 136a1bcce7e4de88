use crate::index::SearchIndex;
use serde::Serialize;
use unicode_normalization::UnicodeNormalization;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub term: String,
    /// Number of postings for the term (one per document field it occurs in).
    pub frequency: usize,
}

impl SearchIndex {
    /// Autocomplete over the term dictionary.
    ///
    /// The prefix is trimmed of surrounding whitespace and lower-cased, then
    /// matched against stemmed terms without the minimum-length filter used at
    /// index time. Most frequent terms come first, then alphabetical.
    pub fn suggest(&self, prefix: &str, limit: Option<usize>) -> Vec<Suggestion> {
        let limit = limit.unwrap_or(self.config().suggest_limit);
        let prefix = prefix.trim().nfc().collect::<String>().to_lowercase();

        let mut suggestions: Vec<Suggestion> = self
            .postings
            .iter()
            .filter(|(term, _)| term.starts_with(&prefix))
            .map(|(term, postings)| Suggestion { term: term.clone(), frequency: postings.len() })
            .collect();
        suggestions.sort_by(|a, b| b.frequency.cmp(&a.frequency).then_with(|| a.term.cmp(&b.term)));
        suggestions.truncate(limit);
        suggestions
    }
}
