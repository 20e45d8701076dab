use thiserror::Error;

/// Query-time failures. None of these are fatal to the embedding
/// application; search is an enhancement, not a page-load dependency.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Failed to load index manifest: {cause}")]
    ManifestLoad { cause: String },

    #[error("Failed to load bucket '{bucket}': {cause}")]
    BucketLoad { bucket: String, cause: String },

    #[error("Bucket '{bucket}' failed to parse: {cause}")]
    MalformedBucket { bucket: String, cause: String },

    #[error("Query superseded by newer input")]
    Superseded,
}

pub type QueryResult<T> = Result<T, QueryError>;
