//! Raw column metadata from the wire.
//!
//! This struct preserves the `(name, type)` pair exactly as sent.
//! For introspection, use `ColumnInfo`, which holds the parsed types.

use serde::Deserialize;

/// Raw column metadata: name and type descriptor string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ColumnMetadata {
    /// Column name.
    pub name: String,
    /// Type descriptor, e.g. `array(int null)`.
    #[serde(rename = "type")]
    pub type_name: String,
}

impl ColumnMetadata {
    /// Create new column metadata.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}
