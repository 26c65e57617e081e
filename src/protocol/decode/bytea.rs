//! BYTEA decoder.
//!
//! Binary values arrive as hex text with a `\x` marker: `\x68656c6c6f`.
//! The marker is optional.

use crate::error::{Error, Result};
use crate::protocol::constants::BYTEA_PREFIX;

/// Decode `\x`-prefixed hex text into raw bytes.
pub fn decode_bytea(text: &str) -> Result<Vec<u8>> {
    let digits = text.strip_prefix(BYTEA_PREFIX).unwrap_or(text);
    hex::decode(digits).map_err(|e| Error::decode("bytea", format!("'{}' ({})", text, e)))
}
