//! Firebolt thin client result layer for Rust
//!
//! Decodes Firebolt query results into typed rows. Column types arrive as
//! textual descriptors (`array(decimal(38, 9) null)`), values as JSON, and
//! rows either as fully buffered documents or as a stream of JSON lines.
//! Both sources are read through the same `Cursor` trait.
//!
//! # Example
//!
//! ```no_run
//! use firebolt_thin_rs::{Cursor, Result, StreamingRows};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // Any AsyncRead works as a response body, e.g. an HTTP body reader.
//!     let body: &[u8] = br#"{"message_type":"START","result_columns":[
//!     {"name":"price","type":"decimal(38, 9) null"}]}
//! {"message_type":"DATA","data":[["123.456000000"],[null]]}
//! {"message_type":"FINISHED_WITH_SUCCESS"}
//! "#;
//!
//!     let mut rows = StreamingRows::new(vec![body]);
//!     let columns = rows.columns().await?;
//!     println!("precision/scale: {:?}", columns.precision_scale(0)?);
//!
//!     while let Some(row) = rows.next().await? {
//!         println!("{}", row.get(0).map(|v| v.to_string()).unwrap_or_default());
//!     }
//!
//!     rows.close().await?;
//!     Ok(())
//! }
//! ```

pub mod buffered;
pub mod cursor;
pub mod error;
pub mod protocol;
pub mod streaming;

// Re-export main types
pub use buffered::BufferedRows;
pub use cursor::{Cursor, CursorStreamExt};
pub use error::{Error, Result};
pub use protocol::parse_type;
pub use protocol::response::{ErrorDetails, Statistics};
pub use protocol::types::{
    BigDecimal, BigInt, Column, ColumnInfo, ColumnMetadata, Decimal, DecimalCompose, DecimalForm,
    FireboltValue, NullDecimal, Row, ScanKind, TypeDescriptor, TypeKind,
};
pub use streaming::{StreamParams, StreamingRows};
