//! Extractor input: the records the documentation generator hands us.
//!
//! The extractor itself is an external collaborator; we only define the
//! record shape and a JSON Lines reader for it. One JSON object per line:
//!
//! ```json
//! {"display_name":"addAttribute","container_name":"OmXmlWriter","anchor_url":"../class_om_xml_writer.html#a40e2","signature_hint":"(const char *attribute, const char *value)"}
//! ```

use serde::{Deserialize, Serialize};
use std::io::BufRead;
use std::path::Path;

use crate::indexing::{IndexError, IndexResult};

/// One documented-symbol tuple from the extractor, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedSymbol {
    pub display_name: String,
    pub container_name: String,
    pub anchor_url: String,
    /// Distinguishes overloads sharing a display name; may be empty.
    #[serde(default)]
    pub signature_hint: String,
}

/// Read extractor records from a JSON Lines stream. Blank lines are
/// allowed; anything else must parse, with the line number reported on
/// failure.
pub fn read_extractor_lines(reader: impl BufRead) -> IndexResult<Vec<ExtractedSymbol>> {
    let mut symbols = Vec::new();

    for (number, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| IndexError::FileRead {
            path: "<input>".into(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let symbol = serde_json::from_str(&line).map_err(|source| IndexError::InputLine {
            line: number + 1,
            source,
        })?;
        symbols.push(symbol);
    }

    Ok(symbols)
}

/// Read extractor records from a JSON Lines file.
pub fn read_extractor_file(path: impl AsRef<Path>) -> IndexResult<Vec<ExtractedSymbol>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|source| IndexError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    read_extractor_lines(std::io::BufReader::new(file))
}
