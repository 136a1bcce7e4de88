use crate::error::{IndexError, Result};
use crate::index::SearchIndex;
use crate::{DocumentRecord, Posting};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, create_dir_all};
use std::path::{Path, PathBuf};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::info;

pub const SNAPSHOT_VERSION: u32 = 1;

pub type Postings = HashMap<String, Vec<Posting>>;
pub type Documents = HashMap<String, DocumentRecord>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaFile {
    pub version: u32,
    pub num_docs: usize,
    pub num_terms: usize,
    pub saved_at: String,
}

/// File layout of a snapshot directory.
pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn postings(&self) -> PathBuf { self.root.join("index.bin") }
    pub fn documents(&self) -> PathBuf { self.root.join("documents.json") }
    pub fn meta(&self) -> PathBuf { self.root.join("meta.json") }
}

/// Write through a sibling temp file and rename, so readers never see a half-written artifact.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

pub fn save_postings(paths: &IndexPaths, postings: &Postings) -> Result<()> {
    create_dir_all(&paths.root)?;
    let bytes = bincode::serialize(postings)?;
    write_atomic(&paths.postings(), &bytes)
}

pub fn load_postings(paths: &IndexPaths) -> Result<Postings> {
    let buf = fs::read(paths.postings())?;
    let postings = bincode::deserialize(&buf)?;
    Ok(postings)
}

// Metadata is schema-less JSON, which bincode cannot decode, so the document store stays JSON.
pub fn save_documents(paths: &IndexPaths, documents: &Documents) -> Result<()> {
    create_dir_all(&paths.root)?;
    let bytes = serde_json::to_vec(documents)?;
    write_atomic(&paths.documents(), &bytes)
}

pub fn load_documents(paths: &IndexPaths) -> Result<Documents> {
    let buf = fs::read(paths.documents())?;
    let documents = serde_json::from_slice(&buf)?;
    Ok(documents)
}

pub fn save_meta(paths: &IndexPaths, meta: &MetaFile) -> Result<()> {
    create_dir_all(&paths.root)?;
    let json = serde_json::to_string_pretty(meta)?;
    write_atomic(&paths.meta(), json.as_bytes())
}

pub fn load_meta(paths: &IndexPaths) -> Result<MetaFile> {
    let buf = fs::read_to_string(paths.meta())?;
    let meta: MetaFile = serde_json::from_str(&buf)?;
    if meta.version != SNAPSHOT_VERSION {
        return Err(IndexError::Version {
            path: paths.meta(),
            found: meta.version,
            expected: SNAPSHOT_VERSION,
        });
    }
    Ok(meta)
}

impl SearchIndex {
    fn paths(&self) -> Result<IndexPaths> {
        self.config().data_dir.as_ref().map(IndexPaths::new).ok_or(IndexError::NoStorage)
    }

    /// Write the inverted index and document store to the data directory.
    pub fn save(&self) -> Result<()> {
        let paths = self.paths()?;
        save_postings(&paths, &self.postings)?;
        save_documents(&paths, &self.documents)?;
        let meta = MetaFile {
            version: SNAPSHOT_VERSION,
            num_docs: self.documents.len(),
            num_terms: self.postings.len(),
            saved_at: OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_else(|_| "".into()),
        };
        save_meta(&paths, &meta)?;
        info!(root = %paths.root.display(), documents = meta.num_docs, terms = meta.num_terms, "saved index");
        Ok(())
    }

    /// Replace the in-memory state with the snapshot in the data directory.
    ///
    /// On error the current state is left untouched.
    pub fn load(&mut self) -> Result<()> {
        let paths = self.paths()?;
        let meta = load_meta(&paths)?;
        let postings = load_postings(&paths)?;
        let documents = load_documents(&paths)?;
        self.postings = postings;
        self.documents = documents;
        info!(
            root = %paths.root.display(),
            documents = self.documents.len(),
            terms = self.postings.len(),
            saved_at = %meta.saved_at,
            "loaded index"
        );
        Ok(())
    }
}
