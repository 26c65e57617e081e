//! Numeric decoders.
//!
//! - INT: JSON integer, range-checked into `i32`.
//! - LONG: JSON integer or decimal text (the server may quote 64-bit values
//!   to keep them exact).
//! - FLOAT / DOUBLE: JSON number or one of `inf`, `-inf`, `nan`, `-nan`.
//! - DECIMAL: JSON number or numeric text, parsed exactly from its digits.

use serde_json::Value;

use super::describe;
use crate::error::{Error, Result};
use crate::protocol::constants::{FLOAT_INF, FLOAT_NAN, FLOAT_NEG_INF, FLOAT_NEG_NAN};
use crate::protocol::types::Decimal;

/// Decode an INT value.
pub fn decode_int(raw: &Value) -> Result<i32> {
    raw.as_i64()
        .and_then(|v| i32::try_from(v).ok())
        .ok_or_else(|| Error::decode("int", describe(raw)))
}

/// Decode a LONG value from a JSON integer or decimal text.
pub fn decode_long(raw: &Value) -> Result<i64> {
    let value = match raw {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    value.ok_or_else(|| Error::decode("long", describe(raw)))
}

fn float_special(text: &str) -> Option<f64> {
    match text {
        FLOAT_INF => Some(f64::INFINITY),
        FLOAT_NEG_INF => Some(f64::NEG_INFINITY),
        FLOAT_NAN => Some(f64::NAN),
        FLOAT_NEG_NAN => Some(-f64::NAN),
        _ => None,
    }
}

fn decode_f64(raw: &Value, expected: &str) -> Result<f64> {
    let value = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => float_special(s),
        _ => None,
    };
    value.ok_or_else(|| Error::decode(expected, describe(raw)))
}

/// Decode a FLOAT value.
///
/// Finite values outside the `f32` range are rejected rather than rounded to
/// infinity.
pub fn decode_float(raw: &Value) -> Result<f32> {
    let value = decode_f64(raw, "float")?;
    if value.is_finite() && value.abs() > f64::from(f32::MAX) {
        return Err(Error::decode("float", describe(raw)));
    }
    Ok(value as f32)
}

/// Decode a DOUBLE PRECISION value.
pub fn decode_double(raw: &Value) -> Result<f64> {
    decode_f64(raw, "double")
}

/// Decode a DECIMAL value exactly.
///
/// JSON numbers keep their wire text (`arbitrary_precision`), so both
/// `123.456000000` and `"123.456000000"` decode to coefficient
/// `123456000000`, exponent `-9`. Values needing more than `precision`
/// digits on either side of the point are rejected.
pub fn decode_decimal(raw: &Value, precision: u32) -> Result<Decimal> {
    let parsed = match raw {
        Value::Number(n) => n.to_string().parse::<Decimal>(),
        Value::String(s) => s.trim().parse::<Decimal>(),
        _ => return Err(Error::decode("decimal", describe(raw))),
    };
    match parsed {
        Ok(decimal) if decimal.fits_precision(precision) => Ok(decimal),
        _ => Err(Error::decode(format!("decimal({})", precision), describe(raw))),
    }
}
