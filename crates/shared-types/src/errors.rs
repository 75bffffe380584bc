//! # Error Types
//!
//! Errors raised while decoding or encoding wire representations.

use thiserror::Error;

/// Wire-format errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The outer signed-transaction envelope did not decode.
    #[error("Malformed signed transaction: {0}")]
    MalformedEnvelope(String),

    /// The transaction body bytes did not decode.
    #[error("Malformed transaction body: {0}")]
    MalformedBody(String),

    /// A value could not be encoded.
    #[error("Encoding failed: {0}")]
    Encode(String),
}
