//! Error type for store operations.

use thiserror::Error;

use assay_query::QueryError;
use assay_record::RecordError;

/// Errors produced by the store access layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Query translation failed.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// A record or measurement result failed schema validation.
    #[error(transparent)]
    Record(#[from] RecordError),

    /// No live document with the given id.
    #[error("no document with id '{0}'")]
    NotFound(String),

    /// An update named a field path that does not exist in the document.
    #[error("no field at path '{0}'")]
    BadUpdatePath(String),

    /// A result removal index points past the end of the results array.
    #[error("result index {index} out of bounds for {len} results")]
    RemoveIndexOutOfBounds {
        /// The offending index.
        index: usize,
        /// Number of results in the document being updated.
        len: usize,
    },

    /// A document failed to serialize or deserialize.
    #[error("document serialization failed: {0}")]
    Serde(#[from] serde_json::Error),

    /// The backend failed to read or write its storage.
    #[error("backend i/o failed: {0}")]
    Io(#[from] std::io::Error),

    /// A stored document violated a store invariant.
    #[error("corrupt stored document: {0}")]
    Corrupt(&'static str),
}
