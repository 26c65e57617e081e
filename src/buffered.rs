//! Row source over fully buffered JSON responses.

use bytes::Bytes;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::protocol::decode::decode_row;
use crate::protocol::response::{parse_query_responses, QueryResponse, Statistics};
use crate::protocol::types::{ColumnInfo, Row};

/// Cursor over result sets that were received in full.
///
/// Each `QueryResponse` is one result set. Raw rows are decoded one at a
/// time as `next()` is called, so a decode error in row N leaves rows
/// before it already returned and rows after it still available.
///
/// # Example
///
/// ```no_run
/// use firebolt_thin_rs::{BufferedRows, Cursor};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let body = br#"{"meta":[{"name":"id","type":"long"}],"data":[[1],[2]]}
/// {"meta":[{"name":"name","type":"text"}],"data":[["a"]]}"#;
///     let mut rows = BufferedRows::from_body(bytes::Bytes::from_static(body))?;
///
///     loop {
///         while let Some(row) = rows.next().await? {
///             println!("{:?}", row);
///         }
///         if !rows.next_result_set().await? {
///             break;
///         }
///     }
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct BufferedRows {
    /// Result set documents, `data` taken out once entered.
    responses: Vec<QueryResponse>,
    /// Index of the current result set.
    result_set: usize,
    /// Remaining raw rows of the current result set.
    pending: std::vec::IntoIter<Vec<Value>>,
    /// Parsed columns of the current result set.
    column_info: Arc<ColumnInfo>,
    /// Total rows returned so far.
    rows_returned: u64,
    closed: bool,
}

impl BufferedRows {
    /// Create a cursor over already-parsed result set documents.
    ///
    /// Fails with `Error::Server` if any document reports errors, and with
    /// `Error::TypeParse` if the first result set's metadata is malformed.
    /// An empty list is treated as one result set without columns.
    pub fn new(mut responses: Vec<QueryResponse>) -> Result<Self> {
        if let Some(failed) = responses.iter_mut().find(|r| !r.errors.is_empty()) {
            let errors = std::mem::take(&mut failed.errors);
            warn!(count = errors.len(), "buffered response reports server errors");
            return Err(Error::Server { errors });
        }
        if responses.is_empty() {
            responses.push(QueryResponse::default());
        }

        let mut rows = Self {
            responses,
            result_set: 0,
            pending: Vec::new().into_iter(),
            column_info: Arc::new(ColumnInfo::default()),
            rows_returned: 0,
            closed: false,
        };
        rows.enter_result_set()?;
        Ok(rows)
    }

    /// Parse a response body of concatenated JSON documents and create a
    /// cursor over it.
    pub fn from_body(body: Bytes) -> Result<Self> {
        let responses = parse_query_responses(&body)?;
        debug!(result_sets = responses.len(), bytes = body.len(), "parsed buffered response");
        Self::new(responses)
    }

    /// Index of the current result set (0-based).
    pub fn result_set_index(&self) -> usize {
        self.result_set
    }

    /// Number of result sets in the response.
    pub fn result_set_count(&self) -> usize {
        self.responses.len()
    }

    /// Statistics reported for the current result set.
    pub fn statistics(&self) -> Option<&Statistics> {
        self.responses
            .get(self.result_set)
            .and_then(|r| r.statistics.as_ref())
    }

    /// Parse metadata and take the raw rows of the current result set.
    fn enter_result_set(&mut self) -> Result<()> {
        let response = &mut self.responses[self.result_set];
        self.pending = std::mem::take(&mut response.data).into_iter();

        match ColumnInfo::from_metadata(&response.meta) {
            Ok(info) => {
                debug!(
                    result_set = self.result_set,
                    columns = info.len(),
                    rows = self.pending.len(),
                    "entered buffered result set"
                );
                self.column_info = Arc::new(info);
                Ok(())
            }
            Err(e) => {
                // Rows cannot be decoded without their columns.
                self.pending = Vec::new().into_iter();
                self.column_info = Arc::new(ColumnInfo::default());
                Err(e)
            }
        }
    }
}

impl Cursor for BufferedRows {
    async fn columns(&mut self) -> Result<Arc<ColumnInfo>> {
        if self.closed {
            return Err(Error::CursorClosed);
        }
        Ok(Arc::clone(&self.column_info))
    }

    fn rowcount(&self) -> u64 {
        self.rows_returned
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn has_next_result_set(&self) -> bool {
        !self.closed && self.result_set + 1 < self.responses.len()
    }

    async fn next(&mut self) -> Result<Option<Row>> {
        if self.closed {
            return Ok(None);
        }
        let Some(raw) = self.pending.next() else {
            return Ok(None);
        };
        let values = decode_row(&self.column_info, raw)?;
        self.rows_returned += 1;
        Ok(Some(Row::new(values, Arc::clone(&self.column_info))))
    }

    async fn next_result_set(&mut self) -> Result<bool> {
        if !self.has_next_result_set() {
            self.close().await?;
            return Ok(false);
        }
        self.result_set += 1;
        self.enter_result_set()?;
        Ok(true)
    }

    async fn close(&mut self) -> Result<()> {
        if !self.closed {
            debug!(rows = self.rows_returned, "closing buffered rows");
            self.closed = true;
            self.pending = Vec::new().into_iter();
            self.responses.clear();
            self.column_info = Arc::new(ColumnInfo::default());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::types::{ColumnMetadata, FireboltValue};
    use serde_json::json;

    fn response(meta: &[(&str, &str)], data: Vec<Vec<Value>>) -> QueryResponse {
        QueryResponse {
            meta: meta
                .iter()
                .map(|(name, ty)| ColumnMetadata::new(*name, *ty))
                .collect(),
            data,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_single_result_set() {
        let mut rows = BufferedRows::new(vec![response(
            &[("id", "int"), ("name", "text null")],
            vec![vec![json!(1), json!("a")], vec![json!(2), Value::Null]],
        )])
        .unwrap();

        assert_eq!(rows.columns().await.unwrap().column_names(), vec!["id", "name"]);
        let first = rows.next().await.unwrap().unwrap();
        assert_eq!(first.get(0), Some(&FireboltValue::Int(1)));
        let second = rows.next().await.unwrap().unwrap();
        assert_eq!(second.get_by_name("name"), Some(&FireboltValue::Null));
        assert!(rows.next().await.unwrap().is_none());
        assert!(rows.next().await.unwrap().is_none());
        assert_eq!(rows.rowcount(), 2);
        assert!(!rows.has_next_result_set());
    }

    #[tokio::test]
    async fn test_decode_error_skips_only_that_row() {
        let mut rows = BufferedRows::new(vec![response(
            &[("id", "int")],
            vec![vec![json!(1)], vec![json!("x")], vec![json!(3)]],
        )])
        .unwrap();

        assert!(rows.next().await.unwrap().is_some());
        assert!(rows.next().await.unwrap_err().is_decode());
        let third = rows.next().await.unwrap().unwrap();
        assert_eq!(third.get(0), Some(&FireboltValue::Int(3)));
        assert_eq!(rows.rowcount(), 2);
    }

    #[tokio::test]
    async fn test_server_errors_are_reported() {
        let mut failed = QueryResponse::default();
        failed.errors.push(crate::protocol::response::ErrorDetails {
            description: Some("table not found".into()),
            ..Default::default()
        });
        let err = BufferedRows::new(vec![failed]).unwrap_err();
        assert_eq!(err.server_errors().unwrap().len(), 1);
        assert!(err.to_string().contains("table not found"));
    }

    #[tokio::test]
    async fn test_empty_response_list() {
        let mut rows = BufferedRows::new(Vec::new()).unwrap();
        assert!(rows.columns().await.unwrap().is_empty());
        assert!(rows.next().await.unwrap().is_none());
        assert!(!rows.next_result_set().await.unwrap());
        assert!(rows.is_closed());
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let mut rows = BufferedRows::new(vec![
            response(&[("a", "int")], vec![vec![json!(1)]]),
            response(&[("b", "int")], vec![vec![json!(2)]]),
        ])
        .unwrap();

        rows.close().await.unwrap();
        rows.close().await.unwrap();
        assert!(rows.is_closed());
        assert!(!rows.has_next_result_set());
        assert!(rows.next().await.unwrap().is_none());
        assert!(matches!(rows.columns().await, Err(Error::CursorClosed)));
        assert!(!rows.next_result_set().await.unwrap());
    }
}
