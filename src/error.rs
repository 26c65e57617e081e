//! Error types for the Firebolt thin client.

use std::io;
use thiserror::Error;

use crate::protocol::response::ErrorDetails;

/// Result type alias for Firebolt operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Firebolt result decoding and row streaming.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error while reading a response body.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A response document or stream record is not valid JSON.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed type descriptor.
    #[error("Invalid type descriptor '{descriptor}': {message}")]
    TypeParse { descriptor: String, message: String },

    /// Value does not match its declared type.
    #[error("Cannot decode {value} as {expected}")]
    Decode { expected: String, value: String },

    /// Struct value whose keys do not match the declared fields.
    #[error("Struct field mismatch: {message}")]
    StructFields { message: String },

    /// Decimal compose received parts it cannot represent.
    #[error("Invalid decimal: {message}")]
    InvalidDecimal { message: String },

    /// Protocol error in the response framing.
    #[error("Protocol error: {message}")]
    Protocol { message: String },

    /// Structured error reported by the server.
    #[error("Server error: {}", describe_errors(.errors))]
    Server { errors: Vec<ErrorDetails> },

    /// Column index out of bounds.
    #[error("Column index {index} out of bounds (columns: {count})")]
    ColumnIndexOutOfBounds { index: usize, count: usize },

    /// A streamed record exceeded the configured line limit.
    #[error("Stream record exceeds {limit} bytes")]
    LineTooLong { limit: usize },

    /// Cursor used after close.
    #[error("Cursor is closed")]
    CursorClosed,
}

fn describe_errors(errors: &[ErrorDetails]) -> String {
    match errors {
        [] => "no error details".to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{} (and {} more)", first, rest.len()),
    }
}

impl Error {
    /// Create a protocol error.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Create a type descriptor parse error.
    pub fn type_parse(descriptor: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TypeParse {
            descriptor: descriptor.into(),
            message: message.into(),
        }
    }

    /// Create a decode error naming the expected kind and the offending value.
    pub fn decode(expected: impl Into<String>, value: impl std::fmt::Display) -> Self {
        Self::Decode {
            expected: expected.into(),
            value: value.to_string(),
        }
    }

    /// Create a struct field mismatch error.
    pub fn struct_fields(message: impl Into<String>) -> Self {
        Self::StructFields {
            message: message.into(),
        }
    }

    /// Create an invalid decimal error.
    pub fn invalid_decimal(message: impl Into<String>) -> Self {
        Self::InvalidDecimal {
            message: message.into(),
        }
    }

    /// Whether this error came from a value that does not match its type.
    pub fn is_decode(&self) -> bool {
        matches!(self, Error::Decode { .. } | Error::StructFields { .. })
    }

    /// Error details reported by the server, if this is a server error.
    pub fn server_errors(&self) -> Option<&[ErrorDetails]> {
        match self {
            Error::Server { errors } => Some(errors),
            _ => None,
        }
    }
}
