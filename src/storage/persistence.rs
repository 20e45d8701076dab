//! Filesystem layout of a built index.
//!
//! One directory holds `manifest.json` plus one `bucket_<id>.json` per
//! bucket. Writing is deterministic: buckets are emitted in key order and
//! stale files from a previous build are removed first, so identical input
//! produces a byte-identical directory.

use std::path::{Path, PathBuf};

use crate::indexing::Index;
use crate::storage::{encode_bucket, Manifest, StorageError, StorageResult, MANIFEST_FILE};

/// Manages one on-disk index directory.
#[derive(Debug)]
pub struct IndexPersistence {
    base_path: PathBuf,
}

impl IndexPersistence {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Write a built index: every bucket file plus the manifest.
    #[must_use = "Save errors should be handled so a corrupt index is never shipped"]
    pub fn save(&self, index: &Index, pretty: bool) -> StorageResult<()> {
        std::fs::create_dir_all(&self.base_path)?;
        self.remove_stale_files()?;

        let manifest = index.manifest();
        for (id, records) in &index.buckets {
            let bytes = encode_bucket(records, pretty)?;
            std::fs::write(self.base_path.join(id.file_name()), bytes)?;
        }
        std::fs::write(
            self.base_path.join(MANIFEST_FILE),
            manifest.encode(pretty)?,
        )?;

        Ok(())
    }

    /// Load just the manifest; bucket data stays on disk until fetched.
    pub fn load_manifest(&self) -> StorageResult<Manifest> {
        let path = self.base_path.join(MANIFEST_FILE);
        if !path.exists() {
            return Err(StorageError::ManifestNotFound { path });
        }

        let manifest = Manifest::decode(&std::fs::read(&path)?)?;
        if manifest.format != crate::storage::FORMAT_VERSION {
            return Err(StorageError::UnsupportedFormat {
                found: manifest.format,
                supported: crate::storage::FORMAT_VERSION,
            });
        }
        Ok(manifest)
    }

    /// Check if an index exists at the base path.
    pub fn exists(&self) -> bool {
        self.base_path.join(MANIFEST_FILE).exists()
    }

    /// Delete the persisted index.
    pub fn clear(&self) -> Result<(), std::io::Error> {
        if self.base_path.exists() {
            std::fs::remove_dir_all(&self.base_path)?;
        }
        Ok(())
    }

    // A rebuild may produce fewer buckets than the last one; leftover
    // bucket files would shadow the manifest.
    fn remove_stale_files(&self) -> StorageResult<()> {
        for entry in std::fs::read_dir(&self.base_path)? {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name == MANIFEST_FILE || (name.starts_with("bucket_") && name.ends_with(".json")) {
                std::fs::remove_file(entry.path())?;
            }
        }
        Ok(())
    }
}
