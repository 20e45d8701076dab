pub mod error;
pub mod resolver;
pub mod session;
pub mod source;

pub use error::{QueryError, QueryResult};
pub use resolver::{Phase, QueryResolver};
pub use session::{SearchSession, SessionState};
pub use source::{BucketSource, FsBucketSource};
