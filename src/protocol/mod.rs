//! Firebolt wire formats: type descriptors, response documents and value decoding.

pub mod constants;
pub mod decode;
pub mod parser;
pub mod response;
pub mod types;

pub use parser::parse_type;
pub use response::{
    parse_query_responses, ErrorDetails, ErrorLocation, MessageType, QueryResponse, Statistics,
    StreamRecord,
};
pub use types::{Column, ColumnInfo, ColumnMetadata, FireboltValue, Row, TypeDescriptor, TypeKind};
