//! Type-directed decoding of JSON values.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::{
    decode_bytea, decode_date, decode_decimal, decode_double, decode_float, decode_int,
    decode_long, decode_timestamp, decode_timestamptz, describe,
};
use crate::error::{Error, Result};
use crate::protocol::types::{ColumnInfo, FireboltValue, TypeDescriptor, TypeKind};

fn expect_string(raw: Value, expected: &str) -> Result<String> {
    match raw {
        Value::String(s) => Ok(s),
        other => Err(Error::decode(expected, describe(&other))),
    }
}

/// Decode a raw JSON value against its column type.
///
/// `null` decodes to `FireboltValue::Null` for every type, at every nesting
/// level. Any other mismatch is an error; no default is ever substituted.
pub fn decode_value(ty: &TypeDescriptor, raw: Value) -> Result<FireboltValue> {
    if raw.is_null() {
        return Ok(FireboltValue::Null);
    }

    let value = match ty.kind() {
        TypeKind::Int => FireboltValue::Int(decode_int(&raw)?),
        TypeKind::Long => FireboltValue::Long(decode_long(&raw)?),
        TypeKind::Float => FireboltValue::Float(decode_float(&raw)?),
        TypeKind::Double => FireboltValue::Double(decode_double(&raw)?),
        TypeKind::Decimal { precision, .. } => {
            FireboltValue::Decimal(decode_decimal(&raw, *precision)?)
        }
        TypeKind::Text => FireboltValue::Text(expect_string(raw, "text")?),
        TypeKind::Geography => FireboltValue::Geography(expect_string(raw, "geography")?),
        TypeKind::Date => FireboltValue::Date(decode_date(&expect_string(raw, "date")?)?),
        TypeKind::Timestamp => {
            FireboltValue::Timestamp(decode_timestamp(&expect_string(raw, "timestamp")?)?)
        }
        TypeKind::TimestampTz => {
            FireboltValue::TimestampTz(decode_timestamptz(&expect_string(raw, "timestamptz")?)?)
        }
        TypeKind::Boolean => match raw {
            Value::Bool(b) => FireboltValue::Boolean(b),
            other => return Err(Error::decode("boolean", describe(&other))),
        },
        TypeKind::Bytea => FireboltValue::Bytea(decode_bytea(&expect_string(raw, "bytea")?)?),
        TypeKind::Array(element) => match raw {
            Value::Array(items) => FireboltValue::Array(
                items
                    .into_iter()
                    .map(|item| decode_value(element, item))
                    .collect::<Result<Vec<_>>>()?,
            ),
            other => return Err(Error::decode(ty.to_string(), describe(&other))),
        },
        TypeKind::Struct(fields) => match raw {
            Value::Object(object) => FireboltValue::Struct(decode_struct(fields, object)?),
            other => return Err(Error::decode(ty.to_string(), describe(&other))),
        },
    };
    Ok(value)
}

/// Decode a struct; the object's keys must match the declared fields exactly.
fn decode_struct(
    fields: &IndexMap<String, TypeDescriptor>,
    mut object: Map<String, Value>,
) -> Result<IndexMap<String, FireboltValue>> {
    if let Some(missing) = fields.keys().find(|name| !object.contains_key(name.as_str())) {
        return Err(Error::struct_fields(format!("missing field '{}'", missing)));
    }
    if let Some(extra) = object.keys().find(|key| !fields.contains_key(key.as_str())) {
        return Err(Error::struct_fields(format!("unexpected field '{}'", extra)));
    }

    let mut decoded = IndexMap::with_capacity(fields.len());
    for (name, field_type) in fields {
        let raw = object.remove(name).unwrap_or(Value::Null);
        decoded.insert(name.clone(), decode_value(field_type, raw)?);
    }
    Ok(decoded)
}

/// Decode one row against the result set's columns.
///
/// The row either decodes completely or not at all.
pub fn decode_row(info: &ColumnInfo, raw: Vec<Value>) -> Result<Vec<FireboltValue>> {
    if raw.len() != info.len() {
        return Err(Error::protocol(format!(
            "row has {} values, expected {}",
            raw.len(),
            info.len()
        )));
    }
    info.columns
        .iter()
        .zip(raw)
        .map(|(column, value)| decode_value(&column.data_type, value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::parser::parse_type;
    use crate::protocol::types::{ColumnMetadata, Decimal};
    use chrono::NaiveDate;
    use serde_json::json;

    fn decode(descriptor: &str, raw: Value) -> Result<FireboltValue> {
        decode_value(&parse_type(descriptor).unwrap(), raw)
    }

    #[test]
    fn test_null_for_every_kind() {
        for descriptor in [
            "int",
            "long",
            "float",
            "double",
            "text",
            "date",
            "timestamp",
            "timestamptz",
            "boolean",
            "bytea",
            "geography",
            "decimal(38, 9)",
            "array(int)",
            "struct(a int)",
        ] {
            let value = decode(descriptor, Value::Null).unwrap();
            assert_eq!(value, FireboltValue::Null, "{}", descriptor);
        }
    }

    #[test]
    fn test_decode_scalars() {
        assert_eq!(decode("int", json!(7)).unwrap(), FireboltValue::Int(7));
        assert_eq!(decode("long", json!("42")).unwrap(), FireboltValue::Long(42));
        assert_eq!(decode("text", json!("abc")).unwrap(), FireboltValue::Text("abc".into()));
        assert_eq!(decode("boolean", json!(true)).unwrap(), FireboltValue::Boolean(true));
        assert_eq!(
            decode("date", json!("2023-01-05")).unwrap(),
            FireboltValue::Date(NaiveDate::from_ymd_opt(2023, 1, 5).unwrap())
        );
        assert_eq!(
            decode("bytea", json!("\\x0102")).unwrap(),
            FireboltValue::Bytea(vec![1, 2])
        );
        assert_eq!(
            decode("geography", json!("0101000020E6100000")).unwrap(),
            FireboltValue::Geography("0101000020E6100000".into())
        );
    }

    #[test]
    fn test_decode_nullable_decimal() {
        assert_eq!(decode("Decimal(38, 9) null", Value::Null).unwrap(), FireboltValue::Null);
        assert_eq!(
            decode("Decimal(38, 9) null", json!("123.456000000")).unwrap(),
            FireboltValue::Decimal(Decimal::new(123456000000i64, -9))
        );
    }

    #[test]
    fn test_decode_type_mismatch() {
        let err = decode("int", json!("abc")).unwrap_err();
        match err {
            Error::Decode { expected, value } => {
                assert_eq!(expected, "int");
                assert_eq!(value, "\"abc\"");
            }
            other => panic!("Expected Decode error, got {:?}", other),
        }
        assert!(decode("boolean", json!(1)).unwrap_err().is_decode());
        assert!(decode("text", json!(1)).unwrap_err().is_decode());
        assert!(decode("array(int)", json!({"a": 1})).unwrap_err().is_decode());
    }

    #[test]
    fn test_decode_array_preserves_order() {
        assert_eq!(
            decode("array(int)", json!([1, 2, 3])).unwrap(),
            FireboltValue::Array(vec![
                FireboltValue::Int(1),
                FireboltValue::Int(2),
                FireboltValue::Int(3)
            ])
        );
    }

    #[test]
    fn test_decode_nested_arrays_with_nulls() {
        let value = decode("array(array(int null))", json!([[1, 2], [null], []])).unwrap();
        assert_eq!(
            value,
            FireboltValue::Array(vec![
                FireboltValue::Array(vec![FireboltValue::Int(1), FireboltValue::Int(2)]),
                FireboltValue::Array(vec![FireboltValue::Null]),
                FireboltValue::Array(vec![]),
            ])
        );
    }

    #[test]
    fn test_decode_array_element_error() {
        assert!(decode("array(int)", json!([1, "x"])).is_err());
    }

    #[test]
    fn test_decode_struct() {
        let value = decode(
            "struct(`a b` int, s struct(c timestamp null))",
            json!({"s": {"c": null}, "a b": 5}),
        )
        .unwrap();
        let fields = value.as_struct().unwrap();
        assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["a b", "s"]);
        assert_eq!(fields["a b"], FireboltValue::Int(5));
        assert_eq!(fields["s"].as_struct().unwrap()["c"], FireboltValue::Null);
    }

    #[test]
    fn test_decode_struct_is_strict() {
        let err = decode("struct(a int, b int)", json!({"a": 1})).unwrap_err();
        assert!(matches!(err, Error::StructFields { ref message } if message.contains("'b'")));

        let err = decode("struct(a int, b int)", json!({"a": 1, "b": 2, "c": 3})).unwrap_err();
        assert!(matches!(err, Error::StructFields { ref message } if message.contains("'c'")));

        let err = decode("struct(a int, b int)", json!({"a": 1, "c": 3})).unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn test_decode_row() {
        let info = ColumnInfo::from_metadata(&[
            ColumnMetadata::new("id", "int"),
            ColumnMetadata::new("name", "text null"),
        ])
        .unwrap();
        let row = decode_row(&info, vec![json!(1), Value::Null]).unwrap();
        assert_eq!(row, vec![FireboltValue::Int(1), FireboltValue::Null]);

        assert!(matches!(decode_row(&info, vec![json!(1)]), Err(Error::Protocol { .. })));
        assert!(decode_row(&info, vec![json!("x"), Value::Null]).is_err());
    }
}
