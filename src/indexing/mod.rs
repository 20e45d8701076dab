pub mod builder;
pub mod error;
pub mod extractor;

pub use builder::{Index, IndexBuilder};
pub use error::{IndexError, IndexResult};
pub use extractor::{read_extractor_file, read_extractor_lines, ExtractedSymbol};
