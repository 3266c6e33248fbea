//! Error types for vCard codec operations.

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Codec error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Charset label is not one the exporter can write.
    #[error("Unsupported charset: {0}")]
    UnsupportedCharset(String),

    /// Invalid encoded input.
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    /// Base64 decode error.
    #[error("Base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),
}
