//! End-to-end tests over a real on-disk index: build, persist, resolve.
//!
//! The fixture mirrors a slice of a Doxygen-generated function index
//! (overloads of `OmXmlWriter::addAttribute` and friends).

use docdex::config::SearchConfig;
use docdex::search::{FsBucketSource, QueryError, QueryResolver};
use docdex::{ExtractedSymbol, IndexBuilder, IndexPersistence};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn symbol(display: &str, container: &str, anchor: &str, sig: &str) -> ExtractedSymbol {
    ExtractedSymbol {
        display_name: display.to_string(),
        container_name: container.to_string(),
        anchor_url: anchor.to_string(),
        signature_hint: sig.to_string(),
    }
}

fn sample_input() -> Vec<ExtractedSymbol> {
    vec![
        symbol(
            "addAttribute",
            "OmXmlWriter",
            "../class_om_xml_writer.html#a40e2",
            "(const char *attribute, const char *value)",
        ),
        symbol(
            "addAttribute",
            "OmXmlWriter",
            "../class_om_xml_writer.html#a480d",
            "(const char *attribute, long long int value)",
        ),
        symbol(
            "addAttributeF",
            "OmXmlWriter",
            "../class_om_xml_writer.html#a9716",
            "",
        ),
        symbol(
            "setAttributeLimit",
            "OmXmlWriter",
            "../class_om_xml_writer.html#a1111",
            "",
        ),
        symbol("addBlink", "OmBlinker", "../class_om_blinker.html#a7d83", ""),
        symbol(
            "addString",
            "OmEepromClass",
            "../class_om_eeprom_class.html#adb76",
            "(const char *fieldName, uint8_t length)",
        ),
        symbol("beginElement", "OmXmlWriter", "../class_om_xml_writer.html#a12c5", ""),
    ]
}

fn build_index(dir: &Path) {
    let index = IndexBuilder::new(1).build(sample_input()).unwrap();
    IndexPersistence::new(dir.to_path_buf())
        .save(&index, true)
        .unwrap();
}

async fn resolver_for(dir: &Path, config: SearchConfig) -> QueryResolver {
    let source = Arc::new(FsBucketSource::new(dir));
    QueryResolver::load(source, config).await.unwrap()
}

#[tokio::test]
async fn test_exact_match_ranks_before_longer_keys() {
    let dir = TempDir::new().unwrap();
    build_index(dir.path());
    let resolver = resolver_for(dir.path(), SearchConfig::default()).await;

    let rows = resolver.search("addattribute").await.unwrap();

    // Two overload rows for the exact match, then the prefix match
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].display_name, "addAttribute");
    assert_eq!(rows[0].signature_hint, "(const char *attribute, const char *value)");
    assert_eq!(rows[1].display_name, "addAttribute");
    assert_eq!(rows[1].signature_hint, "(const char *attribute, long long int value)");
    assert_eq!(rows[2].display_name, "addAttributeF");
}

#[tokio::test]
async fn test_substring_match_reaches_other_buckets() {
    let dir = TempDir::new().unwrap();
    build_index(dir.path());
    let resolver = resolver_for(dir.path(), SearchConfig::default()).await;

    // "attribute" is a mid-word match for setAttributeLimit, which lives
    // in the s-bucket, not the a-bucket the query prefix names.
    let rows = resolver.search("attribute").await.unwrap();
    let names: Vec<_> = rows.iter().map(|r| r.display_name.as_str()).collect();

    assert!(names.contains(&"setAttributeLimit"));
    // Prefix matches still rank ahead of the substring match
    assert_eq!(names.last(), Some(&"setAttributeLimit"));
    assert_eq!(names[0], "addAttribute");
}

#[tokio::test]
async fn test_prefix_bucket_only_mode_skips_other_buckets() {
    let dir = TempDir::new().unwrap();
    build_index(dir.path());
    let config = SearchConfig {
        scan_all_buckets: false,
        ..SearchConfig::default()
    };
    let resolver = resolver_for(dir.path(), config).await;

    let rows = resolver.search("attribute").await.unwrap();
    let names: Vec<_> = rows.iter().map(|r| r.display_name.as_str()).collect();
    assert!(!names.contains(&"setAttributeLimit"));
    assert!(names.contains(&"addAttribute"));
}

#[tokio::test]
async fn test_query_normalization_matches_builder() {
    let dir = TempDir::new().unwrap();
    build_index(dir.path());
    let resolver = resolver_for(dir.path(), SearchConfig::default()).await;

    // Mixed case and punctuation normalize away before matching
    let rows = resolver.search("Add-Blink!").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].display_name, "addBlink");
    assert_eq!(rows[0].container_name, "OmBlinker");
}

#[tokio::test]
async fn test_no_match_and_empty_query_return_empty() {
    let dir = TempDir::new().unwrap();
    build_index(dir.path());
    let resolver = resolver_for(dir.path(), SearchConfig::default()).await;

    assert!(resolver.search("zzz_no_such_symbol").await.unwrap().is_empty());
    assert!(resolver.search("").await.unwrap().is_empty());
    assert!(resolver.search("!!!").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_max_results_caps_rows() {
    let dir = TempDir::new().unwrap();
    build_index(dir.path());
    let config = SearchConfig {
        max_results: 2,
        ..SearchConfig::default()
    };
    let resolver = resolver_for(dir.path(), config).await;

    let rows = resolver.search("add").await.unwrap();
    assert_eq!(rows.len(), 2);
    // The cap trims from the bottom of the ranking, not the top
    assert_eq!(rows[0].display_name, "addAttribute");
}

#[tokio::test]
async fn test_malformed_bucket_degrades_to_zero_results() {
    let dir = TempDir::new().unwrap();
    build_index(dir.path());
    std::fs::write(dir.path().join("bucket_s.json"), b"{ not valid json").unwrap();

    let resolver = resolver_for(dir.path(), SearchConfig::default()).await;

    // The broken bucket contributes nothing but healthy buckets still match
    let rows = resolver.search("attribute").await.unwrap();
    let names: Vec<_> = rows.iter().map(|r| r.display_name.as_str()).collect();
    assert!(!names.contains(&"setAttributeLimit"));
    assert!(names.contains(&"addAttribute"));
}

#[tokio::test]
async fn test_missing_bucket_file_is_a_load_error() {
    let dir = TempDir::new().unwrap();
    build_index(dir.path());
    let resolver = resolver_for(dir.path(), SearchConfig::default()).await;

    std::fs::remove_file(dir.path().join("bucket_a.json")).unwrap();
    let err = resolver.search("addblink").await.unwrap_err();
    assert!(matches!(err, QueryError::BucketLoad { .. }));
}

#[tokio::test]
async fn test_bucket_cache_survives_file_removal() {
    let dir = TempDir::new().unwrap();
    build_index(dir.path());
    let resolver = resolver_for(dir.path(), SearchConfig::default()).await;

    // First search loads and caches the a-bucket
    assert!(!resolver.search("addblink").await.unwrap().is_empty());

    // Removing the file no longer matters for cached buckets
    std::fs::remove_file(dir.path().join("bucket_a.json")).unwrap();
    assert!(!resolver.search("addblink").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_manifest_is_a_manifest_error() {
    let dir = TempDir::new().unwrap();
    let source = Arc::new(FsBucketSource::new(dir.path()));
    let err = QueryResolver::load(source, SearchConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, QueryError::ManifestLoad { .. }));
}
