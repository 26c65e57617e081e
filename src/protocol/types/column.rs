//! Column and ColumnInfo types for result introspection.
//!
//! `ColumnInfo` is built once per result set from the raw `ColumnMetadata`
//! and answers the describe-style questions a SQL client layer asks:
//! nullability, length, precision/scale and native representation. Answers
//! are `None` when the question does not apply to the column's type.

use crate::error::{Error, Result};
use crate::protocol::parser::parse_type;

use super::firebolt_type::{TypeDescriptor, TypeKind};
use super::metadata::ColumnMetadata;

/// Native representation a column decodes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanKind {
    I32,
    I64,
    F32,
    F64,
    String,
    Date,
    NaiveDateTime,
    DateTime,
    Bool,
    Bytes,
    Decimal,
    Array,
    Struct,
}

impl ScanKind {
    fn of(ty: &TypeDescriptor) -> Self {
        match ty.kind() {
            TypeKind::Int => ScanKind::I32,
            TypeKind::Long => ScanKind::I64,
            TypeKind::Float => ScanKind::F32,
            TypeKind::Double => ScanKind::F64,
            TypeKind::Text | TypeKind::Geography => ScanKind::String,
            TypeKind::Date => ScanKind::Date,
            TypeKind::Timestamp => ScanKind::NaiveDateTime,
            TypeKind::TimestampTz => ScanKind::DateTime,
            TypeKind::Boolean => ScanKind::Bool,
            TypeKind::Bytea => ScanKind::Bytes,
            TypeKind::Decimal { .. } => ScanKind::Decimal,
            TypeKind::Array(_) => ScanKind::Array,
            TypeKind::Struct(_) => ScanKind::Struct,
        }
    }
}

/// A column in a result set.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Parsed column type.
    pub data_type: TypeDescriptor,
    /// Type descriptor as sent by the server.
    pub raw_type: String,
}

impl Column {
    /// Create a column from raw metadata, parsing its type descriptor.
    pub fn from_metadata(meta: &ColumnMetadata) -> Result<Self> {
        Ok(Self {
            name: meta.name.clone(),
            data_type: parse_type(&meta.type_name)?,
            raw_type: meta.type_name.clone(),
        })
    }
}

/// Shared column information for all rows in a result set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnInfo {
    /// Column definitions.
    pub columns: Vec<Column>,
}

impl ColumnInfo {
    /// Create new column info from columns.
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Create column info from raw metadata.
    ///
    /// Returns error if any type descriptor fails to parse.
    pub fn from_metadata(metadata: &[ColumnMetadata]) -> Result<Self> {
        let mut info = Self::default();
        info.set_columns(metadata)?;
        Ok(info)
    }

    /// Replace the columns with parsed `metadata`.
    ///
    /// On error the previous columns are kept.
    pub fn set_columns(&mut self, metadata: &[ColumnMetadata]) -> Result<()> {
        let columns: Result<Vec<Column>> = metadata.iter().map(Column::from_metadata).collect();
        self.columns = columns?;
        Ok(())
    }

    /// Get column names.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Get the number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if there are no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Get column by index.
    pub fn get(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    fn column(&self, index: usize) -> Result<&Column> {
        self.columns.get(index).ok_or(Error::ColumnIndexOutOfBounds {
            index,
            count: self.columns.len(),
        })
    }

    /// Find column index by name; exact match first, then case-insensitive.
    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.name == name)
            .or_else(|| self.columns.iter().position(|c| c.name.eq_ignore_ascii_case(name)))
    }

    /// Native representation of the column's values.
    pub fn scan_kind(&self, index: usize) -> Result<ScanKind> {
        Ok(ScanKind::of(&self.column(index)?.data_type))
    }

    /// Whether the column may hold NULL. Always answerable.
    pub fn nullable(&self, index: usize) -> Result<Option<bool>> {
        Ok(Some(self.column(index)?.data_type.is_nullable()))
    }

    /// Maximum length for variable-length columns, `None` for fixed-size kinds.
    pub fn length(&self, index: usize) -> Result<Option<u64>> {
        let length = match self.column(index)?.data_type.kind() {
            TypeKind::Text | TypeKind::Bytea | TypeKind::Geography | TypeKind::Array(_) => {
                Some(u64::MAX)
            }
            _ => None,
        };
        Ok(length)
    }

    /// Precision and scale for decimal columns.
    pub fn precision_scale(&self, index: usize) -> Result<Option<(u32, u32)>> {
        Ok(self.column(index)?.data_type.precision_scale())
    }

    /// Database type name, upper-case without parameters (`DECIMAL`, `ARRAY`...).
    pub fn type_name(&self, index: usize) -> Result<String> {
        Ok(self.column(index)?.data_type.kind_name().to_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_metadata() -> Vec<ColumnMetadata> {
        vec![
            ColumnMetadata::new("id", "long"),
            ColumnMetadata::new("name", "text null"),
            ColumnMetadata::new("price", "Decimal(38, 9) null"),
            ColumnMetadata::new("flag", "boolean"),
            ColumnMetadata::new("tags", "array(text)"),
        ]
    }

    #[test]
    fn test_column_from_metadata() {
        let col = Column::from_metadata(&ColumnMetadata::new("ID", "numeric(10, 2)")).unwrap();
        assert_eq!(col.name, "ID");
        assert_eq!(col.raw_type, "numeric(10, 2)");
        assert_eq!(col.data_type.precision_scale(), Some((10, 2)));
    }

    #[test]
    fn test_column_info_from_metadata() {
        let info = ColumnInfo::from_metadata(&make_test_metadata()).unwrap();
        assert_eq!(info.len(), 5);
        assert_eq!(info.column_names(), vec!["id", "name", "price", "flag", "tags"]);
        assert_eq!(info.find_by_name("NAME"), Some(1));
        assert_eq!(info.find_by_name("unknown"), None);
    }

    #[test]
    fn test_introspection() {
        let info = ColumnInfo::from_metadata(&make_test_metadata()).unwrap();

        assert_eq!(info.scan_kind(0).unwrap(), ScanKind::I64);
        assert_eq!(info.scan_kind(2).unwrap(), ScanKind::Decimal);
        assert_eq!(info.scan_kind(4).unwrap(), ScanKind::Array);

        assert_eq!(info.nullable(0).unwrap(), Some(false));
        assert_eq!(info.nullable(1).unwrap(), Some(true));

        assert_eq!(info.length(1).unwrap(), Some(u64::MAX));
        assert_eq!(info.length(3).unwrap(), None);
        assert_eq!(info.length(4).unwrap(), Some(u64::MAX));

        assert_eq!(info.precision_scale(2).unwrap(), Some((38, 9)));
        assert_eq!(info.precision_scale(0).unwrap(), None);

        assert_eq!(info.type_name(2).unwrap(), "DECIMAL");
    }

    #[test]
    fn test_index_out_of_bounds() {
        let info = ColumnInfo::from_metadata(&make_test_metadata()).unwrap();
        match info.nullable(9) {
            Err(Error::ColumnIndexOutOfBounds { index, count }) => {
                assert_eq!(index, 9);
                assert_eq!(count, 5);
            }
            other => panic!("Expected ColumnIndexOutOfBounds, got {:?}", other),
        }
    }

    #[test]
    fn test_set_columns_keeps_previous_on_error() {
        let mut info = ColumnInfo::from_metadata(&make_test_metadata()).unwrap();
        let bad = vec![ColumnMetadata::new("x", "varchar")];
        assert!(matches!(info.set_columns(&bad), Err(Error::TypeParse { .. })));
        assert_eq!(info.len(), 5);

        info.set_columns(&[ColumnMetadata::new("x", "int")]).unwrap();
        assert_eq!(info.column_names(), vec!["x"]);
    }
}
