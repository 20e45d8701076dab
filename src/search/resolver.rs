//! The query resolver: lazy bucket loading, substring matching, ranking.
//!
//! The resolver owns the manifest and a cache of decoded buckets. It is
//! shared (`&self` throughout) so one instance can serve an interactive
//! session while earlier, superseded searches are still unwinding.

use dashmap::DashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::SearchConfig;
use crate::search::{BucketSource, QueryError, QueryResult};
use crate::storage::{Manifest, FORMAT_VERSION, MANIFEST_FILE};
use crate::types::{normalize_key, BucketId, MatchKind, ResultRow, SymbolRecord};

/// Where a search currently is. Reported to the session's state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Fetching,
    Matching,
}

pub struct QueryResolver {
    manifest: Manifest,
    source: Arc<dyn BucketSource>,
    config: SearchConfig,
    // Decoded buckets live here for the resolver's lifetime; the index is
    // immutable so there is nothing to invalidate.
    cache: DashMap<BucketId, Arc<Vec<SymbolRecord>>>,
}

impl std::fmt::Debug for QueryResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryResolver")
            .field("manifest", &self.manifest)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl QueryResolver {
    /// Fetch and validate the manifest; bucket data stays unfetched until
    /// a query needs it.
    pub async fn load(source: Arc<dyn BucketSource>, config: SearchConfig) -> QueryResult<Self> {
        let bytes = source
            .fetch(MANIFEST_FILE)
            .await
            .map_err(|e| QueryError::ManifestLoad {
                cause: e.to_string(),
            })?;
        let manifest = Manifest::decode(&bytes).map_err(|e| QueryError::ManifestLoad {
            cause: e.to_string(),
        })?;
        if manifest.format != FORMAT_VERSION {
            return Err(QueryError::ManifestLoad {
                cause: format!(
                    "unsupported index format {} (expected {})",
                    manifest.format, FORMAT_VERSION
                ),
            });
        }

        Ok(Self {
            manifest,
            source,
            config,
            cache: DashMap::new(),
        })
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Search without cancellation (batch/CLI use).
    pub async fn search(&self, query: &str) -> QueryResult<Vec<ResultRow>> {
        self.search_with_token(query, &CancellationToken::new())
            .await
    }

    /// Search, observing `token` at fetch and match boundaries. A
    /// cancelled token resolves to [`QueryError::Superseded`]; no partial
    /// results escape for a query that is no longer current.
    pub async fn search_with_token(
        &self,
        query: &str,
        token: &CancellationToken,
    ) -> QueryResult<Vec<ResultRow>> {
        self.search_observed(query, token, &|_| {}).await
    }

    /// Full search entry point with a phase observer for session state.
    pub async fn search_observed(
        &self,
        query: &str,
        token: &CancellationToken,
        on_phase: &(dyn Fn(Phase) + Send + Sync),
    ) -> QueryResult<Vec<ResultRow>> {
        let needle = normalize_key(query);
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let mut matches: Vec<(MatchKind, SymbolRecord)> = Vec::new();
        for id in self.candidate_buckets(&needle) {
            if token.is_cancelled() {
                return Err(QueryError::Superseded);
            }

            let records = match self.bucket(&id, token, on_phase).await {
                Ok(records) => records,
                Err(QueryError::MalformedBucket { bucket, cause }) => {
                    // Degrades to zero results from this bucket; the file
                    // is not cached, so a later search refetches it.
                    warn!(bucket = %bucket, cause = %cause, "skipping malformed bucket");
                    continue;
                }
                Err(other) => return Err(other),
            };

            on_phase(Phase::Matching);
            for record in records.iter() {
                if let Some(kind) = match_key(&record.key, &needle) {
                    matches.push((kind, record.clone()));
                }
            }
        }

        if token.is_cancelled() {
            return Err(QueryError::Superseded);
        }

        matches.sort_by(|(ka, ra), (kb, rb)| {
            ka.cmp(kb)
                .then_with(|| ra.display_name.cmp(&rb.display_name))
                .then_with(|| ra.key.cmp(&rb.key))
        });

        let mut rows = Vec::new();
        'outer: for (_, record) in &matches {
            for occurrence in &record.occurrences {
                if rows.len() >= self.config.max_results {
                    break 'outer;
                }
                rows.push(ResultRow::from_occurrence(record, occurrence));
            }
        }

        debug!(query = %needle, rows = rows.len(), "search complete");
        Ok(rows)
    }

    /// Buckets to search, prefix-compatible ones first.
    ///
    /// A manifest bucket is prefix-compatible when its id and the needle
    /// are prefixes of each other (either direction, since bucket ids may
    /// be longer than a short query). With `scan_all_buckets` the rest of
    /// the manifest follows, which is what makes mid-word matches outside
    /// the prefix bucket reachable.
    fn candidate_buckets(&self, needle: &str) -> Vec<BucketId> {
        let mut candidates: Vec<BucketId> = self
            .manifest
            .buckets
            .keys()
            .filter(|id| {
                needle.starts_with(id.as_str()) || id.as_str().starts_with(needle)
            })
            .cloned()
            .collect();

        if self.config.scan_all_buckets {
            for id in self.manifest.buckets.keys() {
                if !candidates.contains(id) {
                    candidates.push(id.clone());
                }
            }
        }

        candidates
    }

    async fn bucket(
        &self,
        id: &BucketId,
        token: &CancellationToken,
        on_phase: &(dyn Fn(Phase) + Send + Sync),
    ) -> QueryResult<Arc<Vec<SymbolRecord>>> {
        if let Some(cached) = self.cache.get(id) {
            return Ok(Arc::clone(&cached));
        }

        let entry = self
            .manifest
            .bucket(id)
            .ok_or_else(|| QueryError::BucketLoad {
                bucket: id.to_string(),
                cause: "not listed in manifest".to_string(),
            })?;

        on_phase(Phase::Fetching);
        let bytes = tokio::select! {
            _ = token.cancelled() => return Err(QueryError::Superseded),
            fetched = self.source.fetch(&entry.file) => {
                fetched.map_err(|e| QueryError::BucketLoad {
                    bucket: id.to_string(),
                    cause: e.to_string(),
                })?
            }
        };

        let records =
            crate::storage::decode_bucket(&bytes).map_err(|e| QueryError::MalformedBucket {
                bucket: id.to_string(),
                cause: e.to_string(),
            })?;

        let records = Arc::new(records);
        self.cache.insert(id.clone(), Arc::clone(&records));
        debug!(bucket = %id, records = records.len(), "bucket loaded");
        Ok(records)
    }
}

fn match_key(key: &str, needle: &str) -> Option<MatchKind> {
    if key == needle {
        Some(MatchKind::Exact)
    } else if key.starts_with(needle) {
        Some(MatchKind::Prefix)
    } else if key.contains(needle) {
        Some(MatchKind::Substring)
    } else {
        None
    }
}
