use std::path::PathBuf;
use thiserror::Error;

use crate::storage::StorageError;

/// Build-time failures. All of these abort the build: a documentation
/// build must not silently ship a corrupt or partial index.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error(
        "Duplicate anchor '{anchor_url}' for symbol key '{key}'. \
         The extractor emitted the same definition site twice; fix the extractor input."
    )]
    DuplicateAnchor { key: String, anchor_url: String },

    #[error("Empty anchor URL for '{display_name}' in container '{container_name}'")]
    EmptyAnchor {
        display_name: String,
        container_name: String,
    },

    #[error("Symbol name '{display_name}' normalizes to an empty key and cannot be indexed")]
    UnindexableName { display_name: String },

    #[error("Invalid extractor record on line {line}: {source}")]
    InputLine {
        line: usize,
        source: serde_json::Error,
    },

    #[error("Failed to read extractor input {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type IndexResult<T> = Result<T, IndexError>;
