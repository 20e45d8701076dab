//! Where index files come from.
//!
//! The resolver fetches the manifest and bucket files through the
//! [`BucketSource`] seam, so the same resolver serves a local docs tree, a
//! test double with injected latency, or an embedder's HTTP transport.

use async_trait::async_trait;
use std::path::PathBuf;

/// Async fetch of one index file by manifest-relative name.
#[async_trait]
pub trait BucketSource: Send + Sync {
    async fn fetch(&self, file: &str) -> std::io::Result<Vec<u8>>;
}

/// Reads index files from a local directory.
#[derive(Debug, Clone)]
pub struct FsBucketSource {
    base: PathBuf,
}

impl FsBucketSource {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }
}

#[async_trait]
impl BucketSource for FsBucketSource {
    async fn fetch(&self, file: &str) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(self.base.join(file)).await
    }
}
