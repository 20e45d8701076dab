pub mod config;
pub mod indexing;
pub mod logging;
pub mod search;
pub mod storage;
pub mod types;

pub use config::Settings;
pub use indexing::{ExtractedSymbol, Index, IndexBuilder, IndexError, IndexResult};
pub use search::{
    BucketSource, FsBucketSource, QueryError, QueryResolver, QueryResult, SearchSession,
    SessionState,
};
pub use storage::{IndexPersistence, Manifest, StorageError};
pub use types::{normalize_key, BucketId, MatchKind, Occurrence, ResultRow, SymbolRecord};
