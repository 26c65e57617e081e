//! Value decoders for Firebolt JSON results.
//!
//! The server sends every value as JSON; the column type descriptor decides
//! how that JSON maps to a native value.
//!
//! | Type | Module | JSON input |
//! |------|--------|------------|
//! | INT, LONG, FLOAT, DOUBLE, DECIMAL | `number` | number; string for LONG, DECIMAL, specials |
//! | DATE, TIMESTAMP, TIMESTAMPTZ | `date` | string |
//! | BYTEA | `bytea` | `\x`-prefixed hex string |
//! | ARRAY, STRUCT and the rest | `value` | array, object, string, bool |

mod bytea;
mod date;
mod number;
mod value;

pub use bytea::decode_bytea;
pub use date::{decode_date, decode_timestamp, decode_timestamptz};
pub use number::{decode_decimal, decode_double, decode_float, decode_int, decode_long};
pub use value::{decode_row, decode_value};

use serde_json::Value;

const MAX_REPORTED_VALUE: usize = 64;

/// Render a raw value for error messages, truncated to a readable length.
pub(crate) fn describe(raw: &Value) -> String {
    let text = raw.to_string();
    if text.len() <= MAX_REPORTED_VALUE {
        return text;
    }
    let mut end = MAX_REPORTED_VALUE;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}
