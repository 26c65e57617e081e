//! Decoded result rows.
//!
//! Every row of a result set shares that result set's `ColumnInfo`, so name
//! lookups and type introspection never copy column metadata per row.

use std::sync::Arc;

use super::column::{Column, ColumnInfo};
use super::value::FireboltValue;
use crate::error::{Error, Result};

/// One decoded record of a result set.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    values: Vec<FireboltValue>,
    column_info: Arc<ColumnInfo>,
}

impl Row {
    /// Create a row. `values` are in column order.
    pub fn new(values: Vec<FireboltValue>, column_info: Arc<ColumnInfo>) -> Self {
        Self {
            values,
            column_info,
        }
    }

    /// Value at a 0-based column index.
    pub fn get(&self, index: usize) -> Option<&FireboltValue> {
        self.values.get(index)
    }

    /// Value at a 0-based column index, with the same error as the column
    /// introspection calls for a bad index.
    pub fn try_get(&self, index: usize) -> Result<&FireboltValue> {
        self.values.get(index).ok_or(Error::ColumnIndexOutOfBounds {
            index,
            count: self.values.len(),
        })
    }

    /// Value of the column called `name`.
    ///
    /// A column whose name matches exactly wins. Failing that, the first
    /// column whose name matches ignoring ASCII case is used, so with
    /// columns `id` and `ID`, `"ID"` selects the second and `"Id"` the first.
    pub fn get_by_name(&self, name: &str) -> Option<&FireboltValue> {
        let index = self.column_info.find_by_name(name)?;
        self.values.get(index)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[FireboltValue] {
        &self.values
    }

    /// Take the values, dropping the shared column information.
    pub fn into_values(self) -> Vec<FireboltValue> {
        self.values
    }

    /// Column information of the result set this row belongs to.
    pub fn column_info(&self) -> &Arc<ColumnInfo> {
        &self.column_info
    }

    /// Columns paired with their values, in declared order.
    pub fn fields(&self) -> impl Iterator<Item = (&Column, &FireboltValue)> {
        self.column_info.columns.iter().zip(&self.values)
    }
}

impl IntoIterator for Row {
    type Item = FireboltValue;
    type IntoIter = std::vec::IntoIter<FireboltValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::types::ColumnMetadata;

    fn row(columns: &[(&str, &str)], values: Vec<FireboltValue>) -> Row {
        let metadata: Vec<_> = columns
            .iter()
            .map(|(name, ty)| ColumnMetadata::new(*name, *ty))
            .collect();
        Row::new(values, Arc::new(ColumnInfo::from_metadata(&metadata).unwrap()))
    }

    #[test]
    fn test_get_by_index() {
        let row = row(
            &[("name", "text null"), ("value", "int")],
            vec![FireboltValue::Text("test".to_string()), FireboltValue::Int(42)],
        );

        assert_eq!(row.len(), 2);
        assert_eq!(row.get(0).and_then(|v| v.as_str()), Some("test"));
        assert_eq!(row.get(2), None);
        assert_eq!(row.try_get(1).unwrap(), &FireboltValue::Int(42));
        assert!(matches!(
            row.try_get(2),
            Err(Error::ColumnIndexOutOfBounds { index: 2, count: 2 })
        ));
    }

    #[test]
    fn test_get_by_name_prefers_exact_match() {
        let row = row(
            &[("id", "int"), ("ID", "int"), ("Name", "text")],
            vec![
                FireboltValue::Int(1),
                FireboltValue::Int(2),
                FireboltValue::Text("x".to_string()),
            ],
        );

        assert_eq!(row.get_by_name("id"), Some(&FireboltValue::Int(1)));
        assert_eq!(row.get_by_name("ID"), Some(&FireboltValue::Int(2)));
        assert_eq!(row.get_by_name("Id"), Some(&FireboltValue::Int(1)));
        assert_eq!(row.get_by_name("NAME").and_then(|v| v.as_str()), Some("x"));
        assert_eq!(row.get_by_name("missing"), None);
    }

    #[test]
    fn test_fields_share_column_info() {
        let first = row(
            &[("a", "text null"), ("b", "int")],
            vec![FireboltValue::Null, FireboltValue::Int(1)],
        );
        let second = Row::new(
            vec![FireboltValue::Null, FireboltValue::Int(2)],
            Arc::clone(first.column_info()),
        );
        assert!(Arc::ptr_eq(first.column_info(), second.column_info()));

        let fields: Vec<_> = first.fields().map(|(c, v)| (c.name.as_str(), v)).collect();
        assert_eq!(fields, vec![("a", &FireboltValue::Null), ("b", &FireboltValue::Int(1))]);
        assert!(first.fields().next().unwrap().0.data_type.is_nullable());
        assert_eq!(second.into_values(), vec![FireboltValue::Null, FireboltValue::Int(2)]);
    }
}
