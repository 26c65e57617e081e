//! Firebolt column type descriptors.
//!
//! A `TypeDescriptor` is the parsed form of the type string the server sends
//! for each result column, e.g. `array(Decimal(38, 9) null)`. Descriptors
//! are produced by [`parse_type`](crate::protocol::parser::parse_type) and
//! never change after parsing.

use indexmap::IndexMap;
use std::fmt;

/// Kind of a Firebolt type with kind-specific attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    /// INT - 32-bit signed integer.
    Int,
    /// LONG / BIGINT - 64-bit signed integer.
    Long,
    /// FLOAT / REAL - 32-bit float.
    Float,
    /// DOUBLE PRECISION - 64-bit float.
    Double,
    /// TEXT - variable-length string.
    Text,
    /// DATE / PGDATE - calendar date.
    Date,
    /// TIMESTAMP / TIMESTAMPNTZ - date and time without zone.
    Timestamp,
    /// TIMESTAMPTZ - date and time with zone offset.
    TimestampTz,
    /// BOOLEAN.
    Boolean,
    /// BYTEA - binary string.
    Bytea,
    /// GEOGRAPHY - passed through in its wire encoding.
    Geography,
    /// DECIMAL(precision, scale) / NUMERIC(precision, scale).
    Decimal { precision: u32, scale: u32 },
    /// ARRAY(element).
    Array(Box<TypeDescriptor>),
    /// STRUCT(name type, ...) with fields in declaration order.
    Struct(IndexMap<String, TypeDescriptor>),
}

/// Parsed column type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    kind: TypeKind,
    nullable: bool,
}

impl TypeDescriptor {
    /// Create a non-nullable descriptor.
    pub fn new(kind: TypeKind) -> Self {
        Self {
            kind,
            nullable: false,
        }
    }

    /// Create a nullable descriptor.
    pub fn nullable(kind: TypeKind) -> Self {
        Self {
            kind,
            nullable: true,
        }
    }

    pub(crate) fn into_nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Type kind.
    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    /// Whether the type carried the `null` marker.
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Element type for arrays.
    pub fn element(&self) -> Option<&TypeDescriptor> {
        match &self.kind {
            TypeKind::Array(element) => Some(element),
            _ => None,
        }
    }

    /// Fields for structs.
    pub fn fields(&self) -> Option<&IndexMap<String, TypeDescriptor>> {
        match &self.kind {
            TypeKind::Struct(fields) => Some(fields),
            _ => None,
        }
    }

    /// Precision and scale for decimals.
    pub fn precision_scale(&self) -> Option<(u32, u32)> {
        match self.kind {
            TypeKind::Decimal { precision, scale } => Some((precision, scale)),
            _ => None,
        }
    }

    /// Name of the kind without parameters (`array`, `decimal`, `int`...).
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            TypeKind::Int => "int",
            TypeKind::Long => "long",
            TypeKind::Float => "float",
            TypeKind::Double => "double",
            TypeKind::Text => "text",
            TypeKind::Date => "date",
            TypeKind::Timestamp => "timestamp",
            TypeKind::TimestampTz => "timestamptz",
            TypeKind::Boolean => "boolean",
            TypeKind::Bytea => "bytea",
            TypeKind::Geography => "geography",
            TypeKind::Decimal { .. } => "decimal",
            TypeKind::Array(_) => "array",
            TypeKind::Struct(_) => "struct",
        }
    }
}

fn write_field_name(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    let needs_quotes = name.is_empty()
        || name.contains(|c: char| c.is_whitespace() || c == ',' || c == '(' || c == ')');
    if needs_quotes {
        write!(f, "`{}`", name)
    } else {
        write!(f, "{}", name)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TypeKind::Decimal { precision, scale } => {
                write!(f, "decimal({}, {})", precision, scale)?
            }
            TypeKind::Array(element) => write!(f, "array({})", element)?,
            TypeKind::Struct(fields) => {
                write!(f, "struct(")?;
                for (i, (name, ty)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write_field_name(f, name)?;
                    write!(f, " {}", ty)?;
                }
                write!(f, ")")?
            }
            _ => write!(f, "{}", self.kind_name())?,
        }
        if self.nullable {
            write!(f, " null")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_primitives() {
        assert_eq!(TypeDescriptor::new(TypeKind::Int).to_string(), "int");
        assert_eq!(
            TypeDescriptor::nullable(TypeKind::TimestampTz).to_string(),
            "timestamptz null"
        );
    }

    #[test]
    fn test_display_nested() {
        let element = TypeDescriptor::nullable(TypeKind::Decimal {
            precision: 38,
            scale: 9,
        });
        let array = TypeDescriptor::new(TypeKind::Array(Box::new(element)));
        assert_eq!(array.to_string(), "array(decimal(38, 9) null)");

        let mut fields = IndexMap::new();
        fields.insert("a b".to_string(), TypeDescriptor::new(TypeKind::Int));
        fields.insert("s".to_string(), array);
        let st = TypeDescriptor::new(TypeKind::Struct(fields));
        assert_eq!(
            st.to_string(),
            "struct(`a b` int, s array(decimal(38, 9) null))"
        );
    }

    #[test]
    fn test_accessors() {
        let ty = TypeDescriptor::new(TypeKind::Decimal {
            precision: 10,
            scale: 2,
        });
        assert_eq!(ty.precision_scale(), Some((10, 2)));
        assert!(ty.element().is_none());
        assert!(ty.fields().is_none());
        assert!(!ty.is_nullable());
        assert_eq!(ty.kind_name(), "decimal");
    }
}
