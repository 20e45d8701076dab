//! On-disk bucket data format.
//!
//! A bucket file is a JSON array of `[key, displayName, occurrences]`
//! tuples, each occurrence a `[containerName, anchorUrl, signatureHint]`
//! tuple. The shape is self-describing and one bucket parses without
//! touching any other, which is what lets the resolver load buckets lazily.

use serde::{Deserialize, Serialize};

use crate::types::{Occurrence, SymbolRecord};

/// Wire form of an occurrence: `[container, anchor, signature]`.
#[derive(Debug, Serialize, Deserialize)]
struct WireOccurrence(String, String, String);

/// Wire form of a record: `[key, display, occurrences]`.
#[derive(Debug, Serialize, Deserialize)]
struct WireRecord(String, String, Vec<WireOccurrence>);

impl From<&SymbolRecord> for WireRecord {
    fn from(record: &SymbolRecord) -> Self {
        WireRecord(
            record.key.clone(),
            record.display_name.clone(),
            record
                .occurrences
                .iter()
                .map(|o| {
                    WireOccurrence(
                        o.container_name.clone(),
                        o.anchor_url.clone(),
                        o.signature_hint.clone(),
                    )
                })
                .collect(),
        )
    }
}

impl From<WireRecord> for SymbolRecord {
    fn from(wire: WireRecord) -> Self {
        SymbolRecord {
            key: wire.0,
            display_name: wire.1,
            occurrences: wire
                .2
                .into_iter()
                .map(|o| Occurrence {
                    container_name: o.0,
                    anchor_url: o.1,
                    signature_hint: o.2,
                })
                .collect(),
        }
    }
}

/// Serialize one bucket's records. Pretty output is newline-terminated so
/// rebuilds stay diff-friendly under version control.
pub fn encode_bucket(records: &[SymbolRecord], pretty: bool) -> serde_json::Result<Vec<u8>> {
    let wire: Vec<WireRecord> = records.iter().map(WireRecord::from).collect();
    let mut bytes = if pretty {
        serde_json::to_vec_pretty(&wire)?
    } else {
        serde_json::to_vec(&wire)?
    };
    bytes.push(b'\n');
    Ok(bytes)
}

/// Parse one bucket file's contents.
pub fn decode_bucket(bytes: &[u8]) -> serde_json::Result<Vec<SymbolRecord>> {
    let wire: Vec<WireRecord> = serde_json::from_slice(bytes)?;
    Ok(wire.into_iter().map(SymbolRecord::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> SymbolRecord {
        SymbolRecord {
            key: "addattribute".to_string(),
            display_name: "addAttribute".to_string(),
            occurrences: vec![
                Occurrence {
                    container_name: "OmXmlWriter".to_string(),
                    anchor_url: "../class_om_xml_writer.html#a40e2".to_string(),
                    signature_hint: "(const char *attribute, const char *value)".to_string(),
                },
                Occurrence {
                    container_name: "OmXmlWriter".to_string(),
                    anchor_url: "../class_om_xml_writer.html#a480d".to_string(),
                    signature_hint: "(const char *attribute, long long int value)".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_encoded_shape_is_tuple_array() {
        let bytes = encode_bucket(&[sample_record()], false).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        // [[key, display, [[container, anchor, sig], ...]]]
        assert_eq!(value[0][0], "addattribute");
        assert_eq!(value[0][1], "addAttribute");
        assert_eq!(value[0][2][0][0], "OmXmlWriter");
        assert_eq!(value[0][2][1][1], "../class_om_xml_writer.html#a480d");
    }

    #[test]
    fn test_decode_hand_written_bucket() {
        let json = r#"[
            ["begin", "begin", [["OmXmlWriter", "../w.html#abc", ""]]]
        ]"#;
        let records = decode_bucket(json.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].key, "begin");
        assert_eq!(records[0].occurrences[0].container_name, "OmXmlWriter");
        assert!(records[0].occurrences[0].signature_hint.is_empty());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_bucket(b"not json").is_err());
        // Valid JSON, wrong shape
        assert!(decode_bucket(br#"{"key": "value"}"#).is_err());
    }
}
