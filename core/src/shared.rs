use crate::error::Result;
use crate::index::{IndexStats, IndexSummary, RebuildSummary, RemovalSummary, SearchIndex};
use crate::search::{SearchOptions, SearchResponse};
use crate::suggest::Suggestion;
use crate::{Document, Metadata};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Cloneable handle for using one [`SearchIndex`] from several threads.
///
/// Queries share a read lock; mutations, `load` and `rebuild` hold the write
/// lock for their whole duration, so a half-updated posting list is never seen.
#[derive(Clone)]
pub struct SharedIndex {
    inner: Arc<RwLock<SearchIndex>>,
}

impl SharedIndex {
    pub fn new(index: SearchIndex) -> Self {
        Self { inner: Arc::new(RwLock::new(index)) }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, SearchIndex> {
        self.inner.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, SearchIndex> {
        self.inner.write()
    }

    pub fn index_document(
        &self,
        document_id: &str,
        doc_type: &str,
        fields: &Map<String, Value>,
        metadata: Metadata,
    ) -> IndexSummary {
        self.inner.write().index_document(document_id, doc_type, fields, metadata)
    }

    pub fn index(&self, document: Document) -> IndexSummary {
        self.inner.write().index(document)
    }

    pub fn remove_document(&self, document_id: &str) -> RemovalSummary {
        self.inner.write().remove_document(document_id)
    }

    pub fn rebuild<I>(&self, documents: I) -> Result<RebuildSummary>
    where
        I: IntoIterator<Item = Document>,
    {
        self.inner.write().rebuild(documents)
    }

    pub fn search(&self, query: &str, options: &SearchOptions) -> SearchResponse {
        self.inner.read().search(query, options)
    }

    pub fn suggest(&self, prefix: &str, limit: Option<usize>) -> Vec<Suggestion> {
        self.inner.read().suggest(prefix, limit)
    }

    pub fn stats(&self) -> IndexStats {
        self.inner.read().stats()
    }

    pub fn save(&self) -> Result<()> {
        self.inner.read().save()
    }

    pub fn load(&self) -> Result<()> {
        self.inner.write().load()
    }
}
