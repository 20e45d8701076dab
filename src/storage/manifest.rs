//! Index manifest: the one file a resolver always loads.
//!
//! Maps bucket identifiers to their data files so the resolver can fetch
//! only the buckets a query needs, and records enough metadata (format,
//! generator version, symbol count) to validate what it is reading.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::BucketId;

pub const MANIFEST_FILE: &str = "manifest.json";

/// Bumped when the bucket or manifest layout changes incompatibly.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketEntry {
    /// Data file path, relative to the manifest
    pub file: String,
    /// Number of symbol records in the bucket
    pub records: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub format: u32,
    pub generator_version: String,
    pub total_symbols: usize,
    // BTreeMap keeps serialization order stable across rebuilds
    pub buckets: BTreeMap<BucketId, BucketEntry>,
}

impl Manifest {
    pub fn new(generator_version: impl Into<String>) -> Self {
        Self {
            format: FORMAT_VERSION,
            generator_version: generator_version.into(),
            total_symbols: 0,
            buckets: BTreeMap::new(),
        }
    }

    pub fn encode(&self, pretty: bool) -> serde_json::Result<Vec<u8>> {
        let mut bytes = if pretty {
            serde_json::to_vec_pretty(self)?
        } else {
            serde_json::to_vec(self)?
        };
        bytes.push(b'\n');
        Ok(bytes)
    }

    pub fn decode(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }

    /// Entry for the bucket a query prefix falls into, if any.
    pub fn bucket(&self, id: &BucketId) -> Option<&BucketEntry> {
        self.buckets.get(id)
    }
}
