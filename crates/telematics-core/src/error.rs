//! Errors raised while decoding service payloads

use thiserror::Error;

/// Result type for decoding operations
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Errors that can occur while turning a raw service payload into a model
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DecodeError {
    /// A required field was absent
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// A timestamp did not match the fixed-width `YYYYMMDDHHMMSS` layout
    #[error("Malformed timestamp: {0:?}")]
    MalformedTimestamp(String),

    /// A nested JSON document embedded as a string could not be parsed
    #[error("Malformed document in {field}: {message}")]
    MalformedDocument { field: &'static str, message: String },

    /// An array that must hold at least one element was empty
    #[error("Empty array: {0}")]
    EmptyArray(&'static str),

    /// Two arrays that are joined by index differ in length
    #[error("Length mismatch: {left} has {left_len} entries, {right} has {right_len}")]
    LengthMismatch {
        left: &'static str,
        left_len: usize,
        right: &'static str,
        right_len: usize,
    },

    /// The payload did not have the expected shape
    #[error("Malformed payload: {0}")]
    Payload(String),
}

impl DecodeError {
    /// Create a malformed-document error
    pub fn document(field: &'static str, message: impl Into<String>) -> Self {
        Self::MalformedDocument {
            field,
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Payload(err.to_string())
    }
}
