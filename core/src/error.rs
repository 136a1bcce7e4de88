use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode index: {0}")]
    Encode(#[from] bincode::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("no data directory configured, index is memory-only")]
    NoStorage,

    #[error("unsupported snapshot version {found} in {path:?} (expected {expected})")]
    Version { path: PathBuf, found: u32, expected: u32 },
}

pub type Result<T> = std::result::Result<T, IndexError>;
