pub mod bucket;
pub mod error;
pub mod manifest;
pub mod persistence;

pub use bucket::{decode_bucket, encode_bucket};
pub use error::{StorageError, StorageResult};
pub use manifest::{BucketEntry, Manifest, FORMAT_VERSION, MANIFEST_FILE};
pub use persistence::IndexPersistence;
