use crate::config::IndexConfig;
use crate::error::{IndexError, Result};
use crate::tokenizer::analyze;
use crate::{Document, DocumentRecord, Metadata, Posting};
use serde::Serialize;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

/// Metadata keys owned by the record itself; caller-supplied values for them are dropped.
const RESERVED_KEYS: &[&str] = &["id", "type", "indexed_at"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexSummary {
    pub indexed: bool,
    pub document_id: String,
    pub field_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemovalSummary {
    pub removed: bool,
    pub document_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RebuildSummary {
    pub rebuilt: bool,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexStats {
    pub total_documents: usize,
    pub total_terms: usize,
    pub total_postings: usize,
    pub avg_postings_per_term: f64,
    pub by_type: BTreeMap<String, usize>,
}

/// In-memory inverted index plus the document store it ranks against.
///
/// Not internally synchronized; wrap it in [`crate::SharedIndex`] to share
/// between threads.
#[derive(Debug)]
pub struct SearchIndex {
    config: IndexConfig,
    /// term -> postings; a term is only present while it has at least one posting
    pub(crate) postings: HashMap<String, Vec<Posting>>,
    pub(crate) documents: HashMap<String, DocumentRecord>,
}

impl SearchIndex {
    /// Create an empty index. Never touches disk.
    pub fn new(config: IndexConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, postings: HashMap::new(), documents: HashMap::new() })
    }

    /// Create an index and populate it from the configured data directory.
    ///
    /// A missing or unreadable snapshot leaves the index empty; only invalid
    /// configuration is an error.
    pub fn open(config: IndexConfig) -> Result<Self> {
        let mut index = Self::new(config)?;
        match index.load() {
            Ok(()) | Err(IndexError::NoStorage) => {}
            Err(IndexError::Io(err)) if err.kind() == ErrorKind::NotFound => {
                debug!("no snapshot found, starting with an empty index");
            }
            Err(err) => {
                warn!(error = %err, "failed to load index snapshot, starting empty");
                index.clear();
            }
        }
        Ok(index)
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Index (or re-index) one document.
    ///
    /// Any postings left from a previous version of the document are replaced.
    /// `null` and empty-string fields are skipped; the rest are still indexed.
    pub fn index_document(
        &mut self,
        document_id: &str,
        doc_type: &str,
        fields: &Map<String, Value>,
        mut metadata: Metadata,
    ) -> IndexSummary {
        if self.documents.contains_key(document_id) {
            self.purge_postings(document_id);
        }

        let mut field_count = 0;
        for (field, value) in fields {
            let Some(text) = field_text(document_id, field, value) else {
                continue;
            };
            let mut positions: HashMap<String, Vec<u32>> = HashMap::new();
            for (pos, term) in analyze(&text).into_iter().enumerate() {
                positions.entry(term).or_default().push(pos as u32);
            }
            let field_boost = self.config.boost_for(field);
            for (term, positions) in positions {
                let posting = Posting {
                    document_id: document_id.to_string(),
                    field: field.clone(),
                    frequency: positions.len() as u32,
                    positions,
                    field_boost,
                };
                let list = self.postings.entry(term).or_default();
                match list.iter_mut().find(|p| p.document_id == document_id && p.field == *field) {
                    Some(existing) => *existing = posting,
                    None => list.push(posting),
                }
            }
            field_count += 1;
        }

        for key in RESERVED_KEYS {
            if let Some(dropped) = metadata.remove(*key) {
                debug!(document_id, key, value = %dropped, "dropping reserved metadata key");
            }
        }
        self.documents.insert(
            document_id.to_string(),
            DocumentRecord {
                id: document_id.to_string(),
                doc_type: doc_type.to_string(),
                indexed_at: OffsetDateTime::now_utc(),
                metadata,
            },
        );
        debug!(document_id, doc_type, field_count, "indexed document");

        IndexSummary { indexed: true, document_id: document_id.to_string(), field_count }
    }

    /// Convenience wrapper over [`Self::index_document`] for an owned [`Document`].
    pub fn index(&mut self, document: Document) -> IndexSummary {
        let Document { id, doc_type, fields, metadata } = document;
        self.index_document(&id, &doc_type, &fields, metadata)
    }

    /// Drop a document and every posting that references it. Unknown ids are a no-op.
    pub fn remove_document(&mut self, document_id: &str) -> RemovalSummary {
        let existed = self.documents.remove(document_id).is_some();
        let purged = self.purge_postings(document_id);
        debug!(document_id, existed, purged, "removed document");
        RemovalSummary { removed: true, document_id: document_id.to_string() }
    }

    /// Replace the whole index with `documents`, indexed in order, then persist
    /// if a data directory is configured.
    pub fn rebuild<I>(&mut self, documents: I) -> Result<RebuildSummary>
    where
        I: IntoIterator<Item = Document>,
    {
        self.clear();
        let mut count = 0;
        for document in documents {
            self.index(document);
            count += 1;
        }
        info!(count, terms = self.postings.len(), "index rebuilt");
        if self.config.data_dir.is_some() {
            self.save()?;
        }
        Ok(RebuildSummary { rebuilt: true, count })
    }

    pub fn clear(&mut self) {
        self.postings.clear();
        self.documents.clear();
    }

    pub fn stats(&self) -> IndexStats {
        let total_terms = self.postings.len();
        let total_postings: usize = self.postings.values().map(Vec::len).sum();
        let avg_postings_per_term =
            if total_terms == 0 { 0.0 } else { total_postings as f64 / total_terms as f64 };
        let mut by_type = BTreeMap::new();
        for record in self.documents.values() {
            *by_type.entry(record.doc_type.clone()).or_insert(0) += 1;
        }
        IndexStats {
            total_documents: self.documents.len(),
            total_terms,
            total_postings,
            avg_postings_per_term,
            by_type,
        }
    }

    pub fn get_document(&self, document_id: &str) -> Option<&DocumentRecord> {
        self.documents.get(document_id)
    }

    pub fn contains(&self, document_id: &str) -> bool {
        self.documents.contains_key(document_id)
    }

    /// Number of indexed documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    /// Every term currently in the dictionary, in no particular order.
    pub fn terms(&self) -> impl Iterator<Item = &str> + '_ {
        self.postings.keys().map(String::as_str)
    }

    /// Postings for an already-stemmed term.
    pub fn postings(&self, term: &str) -> Option<&[Posting]> {
        self.postings.get(term).map(Vec::as_slice)
    }

    /// Remove every posting of `document_id`, dropping terms left without postings.
    fn purge_postings(&mut self, document_id: &str) -> usize {
        let mut purged = 0;
        self.postings.retain(|_, list| {
            let before = list.len();
            list.retain(|p| p.document_id != document_id);
            purged += before - list.len();
            !list.is_empty()
        });
        purged
    }
}

/// Text to index for a field value, or `None` when the field should be skipped.
///
/// Non-string values are indexed as their JSON text; rendering a `Value` cannot fail.
fn field_text<'a>(document_id: &str, field: &str, value: &'a Value) -> Option<Cow<'a, str>> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        other => {
            debug!(document_id, field, "indexing non-string field as json text");
            Some(Cow::Owned(other.to_string()))
        }
    }
}
