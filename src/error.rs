use thiserror::Error;

/// Failure of the underlying key-value store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o error on `{key}`: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("could not encode value for `{key}`: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced by task operations.
#[derive(Debug, Error)]
pub enum TodoError {
    /// The stored collection could not be parsed.
    #[error("stored tasks are unreadable: {0}")]
    Deserialization(#[from] serde_json::Error),
    /// Reading or writing the store failed.
    #[error("failed to access task storage: {0}")]
    Persistence(#[from] StoreError),
    /// User input was rejected before touching the store.
    #[error("{0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, TodoError>;
