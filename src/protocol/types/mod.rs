//! Firebolt data types for query results.

mod column;
mod decimal;
mod firebolt_type;
mod metadata;
mod row;
mod value;

pub use bigdecimal::{num_bigint::BigInt, BigDecimal};
pub use column::{Column, ColumnInfo, ScanKind};
pub use decimal::{Decimal, DecimalCompose, DecimalForm, Decomposed, NullDecimal};
pub use firebolt_type::{TypeDescriptor, TypeKind};
pub use metadata::ColumnMetadata;
pub use row::Row;
pub use value::FireboltValue;
