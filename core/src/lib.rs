use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;

pub mod config;
pub mod error;
pub mod index;
pub mod persist;
pub mod search;
pub mod shared;
pub mod stemmer;
pub mod suggest;
pub mod tokenizer;

pub use config::IndexConfig;
pub use error::{IndexError, Result};
pub use index::{IndexStats, IndexSummary, RebuildSummary, RemovalSummary, SearchIndex};
pub use search::{SearchHit, SearchOptions, SearchResponse};
pub use shared::SharedIndex;
pub use suggest::Suggestion;

/// Open key/value bag attached to a document by the caller.
pub type Metadata = Map<String, Value>;

/// One occurrence of a term within one field of one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub document_id: String,
    pub field: String,
    /// Token offsets within the field, in ascending order.
    pub positions: Vec<u32>,
    /// Always `positions.len()`.
    pub frequency: u32,
    pub field_boost: f32,
}

/// Stored record for every indexed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    #[serde(with = "time::serde::rfc3339")]
    pub indexed_at: OffsetDateTime,
    #[serde(flatten)]
    pub metadata: Metadata,
}

/// A document as supplied by the storage backend, e.g. for [`SearchIndex::rebuild`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Document {
    pub fn new(id: impl Into<String>, doc_type: impl Into<String>) -> Self {
        Self { id: id.into(), doc_type: doc_type.into(), ..Self::default() }
    }

    /// Builder-style helper to attach a field value.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}
