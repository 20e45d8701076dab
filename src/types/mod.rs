use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalize a display name into a search key.
///
/// Lowercases and keeps only `[a-z0-9_]`; everything else is stripped.
/// The resolver applies the same normalization to queries so that matching
/// is symmetric with bucketing.
pub fn normalize_key(display_name: &str) -> String {
    display_name
        .chars()
        .flat_map(|c| c.to_lowercase())
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
        .collect()
}

/// Identifier of an index bucket: the leading characters of a key.
///
/// Bucket membership is a pure function of the key, so a record always
/// lands in exactly one bucket regardless of input order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BucketId(String);

impl BucketId {
    /// Bucket for a key under the given prefix length.
    ///
    /// Keys shorter than `prefix_len` bucket under the whole key, so an id
    /// is never empty for a non-empty key.
    pub fn for_key(key: &str, prefix_len: usize) -> Self {
        debug_assert!(!key.is_empty(), "keys are validated before bucketing");
        let prefix: String = key.chars().take(prefix_len.max(1)).collect();
        Self(prefix)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name this bucket's data is stored under.
    pub fn file_name(&self) -> String {
        format!("bucket_{}.json", self.0)
    }
}

impl fmt::Display for BucketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One concrete definition site of a symbol: its containing type, the
/// anchor locating it in the generated pages, and an optional overload
/// signature hint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    pub container_name: String,
    pub anchor_url: String,
    /// Empty when the symbol has a single, unambiguous definition.
    #[serde(default)]
    pub signature_hint: String,
}

/// One documented identifier: a unique normalized key, the display name as
/// authored, and every definition site sharing that name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolRecord {
    pub key: String,
    pub display_name: String,
    pub occurrences: Vec<Occurrence>,
}

/// How a record's key matched a query. Variant order is ranking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchKind {
    Exact,
    Prefix,
    Substring,
}

/// One row of a search result. Each occurrence of a matching record is
/// surfaced as its own row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRow {
    pub display_name: String,
    pub container_name: String,
    pub anchor_url: String,
    #[serde(default)]
    pub signature_hint: String,
}

impl ResultRow {
    pub fn from_occurrence(record: &SymbolRecord, occurrence: &Occurrence) -> Self {
        Self {
            display_name: record.display_name.clone(),
            container_name: occurrence.container_name.clone(),
            anchor_url: occurrence.anchor_url.clone(),
            signature_hint: occurrence.signature_hint.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lowercases_and_strips() {
        assert_eq!(normalize_key("addAttribute"), "addattribute");
        assert_eq!(
            normalize_key("OmXmlWriter::addElement"),
            "omxmlwriteraddelement"
        );
        assert_eq!(normalize_key("operator[]"), "operator");
        assert_eq!(normalize_key("set_value_2"), "set_value_2");
    }

    #[test]
    fn test_normalize_can_produce_empty_key() {
        assert_eq!(normalize_key("++"), "");
        assert_eq!(normalize_key(""), "");
    }

    #[test]
    fn test_bucket_id_prefix() {
        assert_eq!(BucketId::for_key("addattribute", 1).as_str(), "a");
        assert_eq!(BucketId::for_key("addattribute", 2).as_str(), "ad");
        // Short keys bucket under the whole key
        assert_eq!(BucketId::for_key("a", 2).as_str(), "a");
        // Zero is treated as one
        assert_eq!(BucketId::for_key("xyz", 0).as_str(), "x");
    }

    #[test]
    fn test_bucket_file_name() {
        assert_eq!(
            BucketId::for_key("beginelement", 1).file_name(),
            "bucket_b.json"
        );
        assert_eq!(BucketId::for_key("_private", 1).file_name(), "bucket__.json");
    }

    #[test]
    fn test_match_kind_ranking_order() {
        assert!(MatchKind::Exact < MatchKind::Prefix);
        assert!(MatchKind::Prefix < MatchKind::Substring);
    }
}
