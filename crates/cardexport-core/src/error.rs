//! Error types for the core library.

use thiserror::Error;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Dialect tag is not recognized.
    #[error("Unknown vCard dialect: {0}")]
    UnknownDialect(String),

    /// Text codec failed.
    #[error("Codec error: {0}")]
    Codec(#[from] cardexport_codec::Error),

    /// Record source failed to open a cursor or fetch a record.
    #[error("Record source error: {0}")]
    Source(String),

    /// The selection matched no records.
    #[error("There's no exportable in the database")]
    EmptyCursor,

    /// An entry was requested before a successful `init`.
    #[error("Session is not initialized")]
    NotInitialized,

    /// A sink refused an event.
    #[error("Handler error: {0}")]
    Handler(String),

    /// A single record is too large to be exported.
    #[error("Record {id} exceeds the size limit: {size} bytes (limit {limit})")]
    ResourceExhausted {
        /// Contact id.
        id: i64,
        /// Offending size in bytes.
        size: usize,
        /// Configured limit in bytes.
        limit: usize,
    },

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
