//! Firebolt value types for query results.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use std::fmt;

use super::decimal::Decimal;

/// A single decoded column value.
///
/// `Null` is SQL NULL and is kept distinct from zero values at every level,
/// including inside arrays and structs.
#[derive(Debug, Clone, PartialEq)]
pub enum FireboltValue {
    /// NULL value.
    Null,
    /// INT value.
    Int(i32),
    /// LONG / BIGINT value.
    Long(i64),
    /// FLOAT / REAL value.
    Float(f32),
    /// DOUBLE PRECISION value.
    Double(f64),
    /// TEXT value.
    Text(String),
    /// DATE value.
    Date(NaiveDate),
    /// TIMESTAMP value (no zone).
    Timestamp(NaiveDateTime),
    /// TIMESTAMPTZ value with the offset it was sent with.
    TimestampTz(DateTime<FixedOffset>),
    /// BOOLEAN value.
    Boolean(bool),
    /// BYTEA value.
    Bytea(Vec<u8>),
    /// GEOGRAPHY value in its wire encoding.
    Geography(String),
    /// DECIMAL value, exact.
    Decimal(Decimal),
    /// ARRAY value.
    Array(Vec<FireboltValue>),
    /// STRUCT value, fields in declared order.
    Struct(IndexMap<String, FireboltValue>),
}

impl FireboltValue {
    /// Check if the value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, FireboltValue::Null)
    }

    /// Try to get the value as a string reference (TEXT or GEOGRAPHY).
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FireboltValue::Text(s) | FireboltValue::Geography(s) => Some(s),
            _ => None,
        }
    }

    /// Try to convert an integral value to i64.
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            FireboltValue::Int(v) => Some(i64::from(*v)),
            FireboltValue::Long(v) => Some(*v),
            FireboltValue::Decimal(d) => d.to_i64(),
            _ => None,
        }
    }

    /// Try to convert a numeric value to f64.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            FireboltValue::Int(v) => Some(f64::from(*v)),
            FireboltValue::Long(v) => Some(*v as f64),
            FireboltValue::Float(v) => Some(f64::from(*v)),
            FireboltValue::Double(v) => Some(*v),
            FireboltValue::Decimal(d) => d.to_f64(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FireboltValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FireboltValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            FireboltValue::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    pub fn as_timestamptz(&self) -> Option<DateTime<FixedOffset>> {
        match self {
            FireboltValue::TimestampTz(ts) => Some(*ts),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<&Decimal> {
        match self {
            FireboltValue::Decimal(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            FireboltValue::Bytea(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[FireboltValue]> {
        match self {
            FireboltValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&IndexMap<String, FireboltValue>> {
        match self {
            FireboltValue::Struct(fields) => Some(fields),
            _ => None,
        }
    }
}

impl fmt::Display for FireboltValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FireboltValue::Null => write!(f, "NULL"),
            FireboltValue::Int(v) => write!(f, "{}", v),
            FireboltValue::Long(v) => write!(f, "{}", v),
            FireboltValue::Float(v) => write!(f, "{}", v),
            FireboltValue::Double(v) => write!(f, "{}", v),
            FireboltValue::Text(s) | FireboltValue::Geography(s) => write!(f, "{}", s),
            FireboltValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            FireboltValue::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S%.f")),
            FireboltValue::TimestampTz(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S%.f%:z")),
            FireboltValue::Boolean(b) => write!(f, "{}", b),
            FireboltValue::Bytea(bytes) => write!(f, "\\x{}", hex::encode(bytes)),
            FireboltValue::Decimal(d) => write!(f, "{}", d),
            FireboltValue::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            FireboltValue::Struct(fields) => {
                write!(f, "{{")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}:{}", name, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_null() {
        let val = FireboltValue::Null;
        assert!(val.is_null());
        assert_eq!(val.as_str(), None);
        assert_eq!(format!("{}", val), "NULL");
    }

    #[test]
    fn test_value_numbers() {
        assert_eq!(FireboltValue::Int(-3).to_i64(), Some(-3));
        assert_eq!(FireboltValue::Long(1 << 40).to_f64(), Some((1u64 << 40) as f64));
        assert_eq!(FireboltValue::Double(1.5).to_i64(), None);
        let d = FireboltValue::Decimal("12.50".parse().unwrap());
        assert_eq!(d.to_f64(), Some(12.5));
        assert_eq!(d.to_string(), "12.50");
    }

    #[test]
    fn test_value_display_nested() {
        let mut fields = IndexMap::new();
        fields.insert("a".to_string(), FireboltValue::Int(1));
        fields.insert(
            "b".to_string(),
            FireboltValue::Array(vec![FireboltValue::Null, FireboltValue::Bytea(vec![0xde, 0xad])]),
        );
        assert_eq!(FireboltValue::Struct(fields).to_string(), "{a:1,b:[NULL,\\xdead]}");
    }
}
