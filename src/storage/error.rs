use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Manifest not found at {path}")]
    ManifestNotFound { path: PathBuf },

    #[error("Unsupported index format {found} (this version reads format {supported})")]
    UnsupportedFormat { found: u32, supported: u32 },
}

pub type StorageResult<T> = Result<T, StorageError>;
