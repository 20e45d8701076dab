//! The index builder: one deterministic pass from extractor tuples to a
//! bucketed, immutable index.
//!
//! Grouping and bucketing both go through `BTreeMap`, so the result is
//! independent of extractor input order and rebuilds from unchanged input
//! serialize byte-identically.

use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::indexing::{ExtractedSymbol, IndexError, IndexResult};
use crate::storage::{BucketEntry, Manifest};
use crate::types::{normalize_key, BucketId, Occurrence, SymbolRecord};

/// A fully built, immutable search index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    pub generator_version: String,
    pub total_symbols: usize,
    pub buckets: BTreeMap<BucketId, Vec<SymbolRecord>>,
}

impl Index {
    /// The manifest describing this index's data files.
    pub fn manifest(&self) -> Manifest {
        let mut manifest = Manifest::new(self.generator_version.clone());
        manifest.total_symbols = self.total_symbols;
        for (id, records) in &self.buckets {
            manifest.buckets.insert(
                id.clone(),
                BucketEntry {
                    file: id.file_name(),
                    records: records.len(),
                },
            );
        }
        manifest
    }
}

/// Builds an [`Index`] from extractor output.
#[derive(Debug)]
pub struct IndexBuilder {
    prefix_len: usize,
}

impl IndexBuilder {
    pub fn new(prefix_len: usize) -> Self {
        Self { prefix_len }
    }

    /// Consume extractor tuples and produce the index.
    ///
    /// Tuples sharing a normalized key collapse into one record with one
    /// occurrence per definition site. Data-integrity problems in the
    /// input (empty anchors, duplicated anchors, names that normalize to
    /// nothing) fail the build rather than being dropped.
    pub fn build(
        &self,
        input: impl IntoIterator<Item = ExtractedSymbol>,
    ) -> IndexResult<Index> {
        let mut records: BTreeMap<String, SymbolRecord> = BTreeMap::new();

        for symbol in input {
            if symbol.anchor_url.is_empty() {
                return Err(IndexError::EmptyAnchor {
                    display_name: symbol.display_name,
                    container_name: symbol.container_name,
                });
            }

            let key = normalize_key(&symbol.display_name);
            if key.is_empty() {
                return Err(IndexError::UnindexableName {
                    display_name: symbol.display_name,
                });
            }

            let record = records.entry(key.clone()).or_insert_with(|| SymbolRecord {
                key: key.clone(),
                display_name: symbol.display_name.clone(),
                occurrences: Vec::new(),
            });

            if record.display_name != symbol.display_name {
                // Case-variant names share a key; the first one seen wins.
                debug!(
                    key = %key,
                    kept = %record.display_name,
                    dropped = %symbol.display_name,
                    "display name collision under one key"
                );
            }

            if record
                .occurrences
                .iter()
                .any(|o| o.anchor_url == symbol.anchor_url)
            {
                return Err(IndexError::DuplicateAnchor {
                    key,
                    anchor_url: symbol.anchor_url,
                });
            }

            record.occurrences.push(Occurrence {
                container_name: symbol.container_name,
                anchor_url: symbol.anchor_url,
                signature_hint: symbol.signature_hint,
            });
        }

        let total_symbols = records.len();
        let mut buckets: BTreeMap<BucketId, Vec<SymbolRecord>> = BTreeMap::new();
        for (key, mut record) in records {
            record
                .occurrences
                .sort_by(|a, b| {
                    (a.container_name.as_str(), a.signature_hint.as_str())
                        .cmp(&(b.container_name.as_str(), b.signature_hint.as_str()))
                });
            buckets
                .entry(BucketId::for_key(&key, self.prefix_len))
                .or_default()
                .push(record);
        }

        info!(
            symbols = total_symbols,
            buckets = buckets.len(),
            "index built"
        );

        Ok(Index {
            generator_version: env!("CARGO_PKG_VERSION").to_string(),
            total_symbols,
            buckets,
        })
    }
}
