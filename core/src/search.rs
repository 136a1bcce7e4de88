//! Field-boosted TF-IDF ranking over the inverted index.
//!
//! For every query term `t` present in the index:
//!
//! ```text
//! idf(t)      = ln(N / max(1, df(t)) + 1)
//! score(d)   += ln(1 + freq(t, d, field)) * idf(t) * boost(field)
//! ```
//!
//! summed over all terms and fields, where `N` is the number of stored
//! documents and `df(t)` the length of the term's posting list.

use crate::index::SearchIndex;
use crate::tokenizer::analyze;
use crate::DocumentRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Only return documents of exactly this type.
    #[serde(rename = "type")]
    pub doc_type: Option<String>,
    /// Page size; falls back to the index's configured default.
    pub limit: Option<usize>,
    pub offset: usize,
}

impl SearchOptions {
    pub fn with_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = Some(doc_type.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub document: DocumentRecord,
    pub score: f64,
    /// Stemmed query terms found in this document, in query order.
    pub matched_terms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchHit>,
    /// Matching documents before pagination.
    pub total: usize,
    pub query: String,
    pub tokens: Vec<String>,
}

impl SearchIndex {
    /// Rank documents against `query`.
    ///
    /// Every analyzed query token contributes, so a repeated word counts once
    /// per occurrence. Equal scores are ordered by document id so paging is stable.
    pub fn search(&self, query: &str, options: &SearchOptions) -> SearchResponse {
        let tokens = analyze(query);
        let limit = options.limit.unwrap_or(self.config().default_limit);

        if tokens.is_empty() {
            return SearchResponse { results: Vec::new(), total: 0, query: query.to_string(), tokens };
        }

        let n = self.documents.len() as f64;
        let mut scores: HashMap<&str, f64> = HashMap::new();
        let mut matched: HashMap<&str, Vec<&str>> = HashMap::new();
        for term in &tokens {
            let Some((term, postings)) = self.postings.get_key_value(term.as_str()) else {
                continue;
            };
            let idf = (n / postings.len().max(1) as f64 + 1.0).ln();
            for posting in postings {
                let tf = (1.0 + posting.frequency as f64).ln();
                let doc = posting.document_id.as_str();
                *scores.entry(doc).or_insert(0.0) += tf * idf * posting.field_boost as f64;
                let terms = matched.entry(doc).or_default();
                if !terms.contains(&term.as_str()) {
                    terms.push(term.as_str());
                }
            }
        }

        let mut ranked: Vec<(&str, f64)> = scores
            .into_iter()
            .filter(|(doc, _)| match self.documents.get(*doc) {
                Some(record) => options.doc_type.as_deref().map_or(true, |t| record.doc_type == t),
                None => false,
            })
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        let total = ranked.len();

        let results: Vec<SearchHit> = ranked
            .into_iter()
            .skip(options.offset)
            .take(limit)
            .filter_map(|(doc, score)| {
                let record = self.documents.get(doc)?;
                let matched_terms = matched
                    .remove(doc)
                    .unwrap_or_default()
                    .into_iter()
                    .map(str::to_owned)
                    .collect();
                Some(SearchHit { document: record.clone(), score, matched_terms })
            })
            .collect();

        debug!(query, total, returned = results.len(), "search");
        SearchResponse { results, total, query: query.to_string(), tokens }
    }
}
