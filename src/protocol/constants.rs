//! Firebolt wire constants.
//!
//! Type keywords as they appear in column type descriptors, streaming
//! message kinds and the text layouts used for date/time values.

// Primitive type keywords
pub const TYPE_INT: &str = "int";
pub const TYPE_INTEGER: &str = "integer";
pub const TYPE_LONG: &str = "long";
pub const TYPE_BIGINT: &str = "bigint";
pub const TYPE_FLOAT: &str = "float";
pub const TYPE_REAL: &str = "real";
pub const TYPE_DOUBLE: &str = "double";
pub const TYPE_PRECISION: &str = "precision";
pub const TYPE_TEXT: &str = "text";
pub const TYPE_STRING: &str = "string";
pub const TYPE_DATE: &str = "date";
pub const TYPE_PGDATE: &str = "pgdate";
pub const TYPE_TIMESTAMP: &str = "timestamp";
pub const TYPE_TIMESTAMP_NTZ: &str = "timestampntz";
pub const TYPE_TIMESTAMP_TZ: &str = "timestamptz";
pub const TYPE_BOOLEAN: &str = "boolean";
pub const TYPE_BOOL: &str = "bool";
pub const TYPE_BYTEA: &str = "bytea";
pub const TYPE_GEOGRAPHY: &str = "geography";

// Composite type keywords
pub const TYPE_ARRAY: &str = "array";
pub const TYPE_DECIMAL: &str = "decimal";
pub const TYPE_NUMERIC: &str = "numeric";
pub const TYPE_STRUCT: &str = "struct";

/// Trailing keyword marking a type as nullable (`int null`).
pub const NULLABLE_KEYWORD: &str = "null";
/// Deepest array/struct nesting accepted in a type descriptor.
pub const MAX_TYPE_DEPTH: usize = 128;

// Streaming message kinds
pub const MSG_START: &str = "START";
pub const MSG_DATA: &str = "DATA";
pub const MSG_FINISHED_WITH_SUCCESS: &str = "FINISHED_WITH_SUCCESS";
pub const MSG_FINISH_WITH_ERROR: &str = "FINISH_WITH_ERROR";
pub const MSG_FINISH_SUCCESSFULLY: &str = "FINISH_SUCCESSFULLY";
pub const MSG_FINISH_WITH_ERRORS: &str = "FINISH_WITH_ERRORS";

// Float special values carried as strings
pub const FLOAT_INF: &str = "inf";
pub const FLOAT_NEG_INF: &str = "-inf";
pub const FLOAT_NAN: &str = "nan";
pub const FLOAT_NEG_NAN: &str = "-nan";

/// Prefix of hex-encoded bytea values.
pub const BYTEA_PREFIX: &str = "\\x";

// Date/time layouts
pub const DATE_LAYOUT: &str = "%Y-%m-%d";
pub const TIMESTAMP_LAYOUT: &str = "%Y-%m-%d %H:%M:%S";
pub const TIMESTAMP_MICROS_LAYOUT: &str = "%Y-%m-%d %H:%M:%S%.f";
/// Accepts `±HH`, `±HHMM` and `±HH:MM`. Offset seconds are handled by the decoder.
pub const TIMESTAMPTZ_LAYOUT: &str = "%Y-%m-%d %H:%M:%S%.f%#z";

/// Default upper bound for a single streamed record.
pub const STREAM_MAX_LINE_DEFAULT: usize = 256 * 1024 * 1024;
/// Default initial capacity of the streamed line buffer.
pub const STREAM_LINE_CAPACITY_DEFAULT: usize = 8 * 1024;
