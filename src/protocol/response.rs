//! Response documents sent by the server.
//!
//! Two encodings exist:
//!
//! - buffered JSON: one document per statement with `meta` (columns) and a
//!   row-major `data` array, plus optional `statistics`;
//! - streaming JSON lines: one record per line tagged by `message_type`
//!   (`START`, `DATA`, `FINISHED_WITH_SUCCESS`, `FINISH_WITH_ERROR`).

use serde::Deserialize;
use serde_json::Value;
use std::fmt;

use crate::error::Result;
use crate::protocol::constants::*;
use crate::protocol::types::ColumnMetadata;

/// Location of an error in the query text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorLocation {
    #[serde(default)]
    pub failing_line: Option<u64>,
    #[serde(default)]
    pub start_offset: Option<u64>,
    #[serde(default)]
    pub end_offset: Option<u64>,
}

/// Structured error entry reported by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetails {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub location: Option<ErrorLocation>,
    #[serde(default)]
    pub help_link: Option<String>,
}

impl fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(severity) = &self.severity {
            write!(f, "{}: ", severity)?;
        }
        if let Some(code) = &self.code {
            write!(f, "{} ", code)?;
        }
        if let Some(name) = &self.name {
            write!(f, "({}) ", name)?;
        }
        write!(f, "{}", self.description.as_deref().unwrap_or("unknown error"))?;
        if let Some(location) = &self.location {
            if let Some(line) = location.failing_line {
                write!(f, " at line {}", line)?;
            }
            if let (Some(start), Some(end)) = (location.start_offset, location.end_offset) {
                write!(f, " [{}..{}]", start, end)?;
            }
        }
        if let Some(resolution) = &self.resolution {
            write!(f, ". {}", resolution)?;
        }
        if let Some(help_link) = &self.help_link {
            write!(f, " (see {})", help_link)?;
        }
        Ok(())
    }
}

/// Query execution statistics.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Statistics {
    #[serde(default)]
    pub elapsed: Option<f64>,
    #[serde(default)]
    pub rows_read: Option<u64>,
    #[serde(default)]
    pub bytes_read: Option<u64>,
    #[serde(default)]
    pub time_before_execution: Option<f64>,
    #[serde(default)]
    pub time_to_execute: Option<f64>,
}

/// One buffered result set document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QueryResponse {
    /// Column metadata.
    #[serde(default)]
    pub meta: Vec<ColumnMetadata>,
    /// Row-major raw values.
    #[serde(default)]
    pub data: Vec<Vec<Value>>,
    /// Row count reported by the server.
    #[serde(default)]
    pub rows: Option<u64>,
    #[serde(default)]
    pub statistics: Option<Statistics>,
    /// Errors reported instead of (or alongside) data.
    #[serde(default)]
    pub errors: Vec<ErrorDetails>,
}

/// Parse a buffered response body.
///
/// The body holds one JSON document per statement, concatenated. An empty
/// body (a statement without a result) yields a single empty document.
pub fn parse_query_responses(body: &[u8]) -> Result<Vec<QueryResponse>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(vec![QueryResponse::default()]);
    }
    let documents = serde_json::Deserializer::from_slice(body)
        .into_iter::<QueryResponse>()
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(documents)
}

/// Streaming record kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum MessageType {
    #[serde(rename = "START")]
    Start,
    #[serde(rename = "DATA")]
    Data,
    #[serde(rename = "FINISHED_WITH_SUCCESS", alias = "FINISH_SUCCESSFULLY")]
    FinishedWithSuccess,
    #[serde(rename = "FINISH_WITH_ERROR", alias = "FINISH_WITH_ERRORS")]
    FinishWithError,
    #[serde(other)]
    Unknown,
}

impl MessageType {
    /// Wire name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Start => MSG_START,
            MessageType::Data => MSG_DATA,
            MessageType::FinishedWithSuccess => MSG_FINISHED_WITH_SUCCESS,
            MessageType::FinishWithError => MSG_FINISH_WITH_ERROR,
            MessageType::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of a streaming response.
///
/// Fields not carried by a given kind are left at their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StreamRecord {
    pub message_type: MessageType,
    /// Columns of the upcoming result set (`START`).
    #[serde(default)]
    pub result_columns: Vec<ColumnMetadata>,
    /// Block of rows (`DATA`).
    #[serde(default)]
    pub data: Vec<Vec<Value>>,
    /// Error details (`FINISH_WITH_ERROR`).
    #[serde(default)]
    pub errors: Vec<ErrorDetails>,
    /// Statistics (`FINISHED_WITH_SUCCESS`).
    #[serde(default)]
    pub statistics: Option<Statistics>,
    #[serde(default)]
    pub query_id: Option<String>,
    #[serde(default)]
    pub query_label: Option<String>,
    #[serde(default)]
    pub request_id: Option<String>,
}

impl StreamRecord {
    /// Parse a single line.
    pub fn parse(line: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(line)?)
    }
}
