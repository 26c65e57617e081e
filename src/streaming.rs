//! Row source over streaming JSON-lines responses.
//!
//! Each segment is the response body of one statement. A segment holds one
//! JSON record per line:
//!
//! ```text
//! {"message_type":"START","result_columns":[{"name":"a","type":"int"}]}
//! {"message_type":"DATA","data":[[1],[2]]}
//! {"message_type":"DATA","data":[[3]]}
//! {"message_type":"FINISHED_WITH_SUCCESS","statistics":{...}}
//! ```
//!
//! Records are read one line at a time, only when a row is needed.

use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tracing::{debug, trace, warn};

use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::protocol::constants::{STREAM_LINE_CAPACITY_DEFAULT, STREAM_MAX_LINE_DEFAULT};
use crate::protocol::decode::decode_row;
use crate::protocol::response::{ErrorDetails, MessageType, Statistics, StreamRecord};
use crate::protocol::types::{ColumnInfo, Row};

/// Tuning for the line reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamParams {
    /// Longest accepted record in bytes, excluding the line terminator.
    pub max_line_length: usize,
    /// Initial capacity of the line buffer.
    pub line_capacity: usize,
}

impl StreamParams {
    /// Create parameters with the defaults (256 MiB records, 8 KiB buffer).
    pub fn new() -> Self {
        Self {
            max_line_length: STREAM_MAX_LINE_DEFAULT,
            line_capacity: STREAM_LINE_CAPACITY_DEFAULT,
        }
    }

    /// Set the longest accepted record.
    ///
    /// A longer record fails with `Error::LineTooLong` instead of growing
    /// the buffer without bound.
    ///
    /// # Example
    ///
    /// ```
    /// use firebolt_thin_rs::StreamParams;
    ///
    /// let params = StreamParams::new().with_max_line_length(16 * 1024 * 1024);
    /// assert_eq!(params.max_line_length, 16 * 1024 * 1024);
    /// ```
    pub fn with_max_line_length(mut self, limit: usize) -> Self {
        self.max_line_length = limit;
        self
    }

    /// Set the initial line buffer capacity.
    pub fn with_line_capacity(mut self, capacity: usize) -> Self {
        self.line_capacity = capacity;
        self
    }
}

impl Default for StreamParams {
    fn default() -> Self {
        Self::new()
    }
}

/// Position within the current segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SegmentState {
    /// START not read yet.
    AwaitingStart,
    /// Between START and the finishing record.
    Reading,
    /// Finished, failed or ended.
    Exhausted,
}

/// Cursor over streamed result sets, one response body per result set.
///
/// Bodies are owned by the cursor. `next_result_set()` drops the current
/// one, `close()` drops all of them, and dropping the cursor releases
/// whatever is left.
///
/// # Example
///
/// ```no_run
/// use firebolt_thin_rs::{Cursor, StreamingRows};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let body: &[u8] = concat!(
///         r#"{"message_type":"START","result_columns":[{"name":"a","type":"int"}]}"#,
///         "\n",
///         r#"{"message_type":"DATA","data":[[1]]}"#,
///         "\n",
///         r#"{"message_type":"FINISHED_WITH_SUCCESS"}"#,
///     )
///     .as_bytes();
///     let mut rows = StreamingRows::new(vec![body]);
///     while let Some(row) = rows.next().await? {
///         println!("{:?}", row);
///     }
///     rows.close().await?;
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct StreamingRows<R> {
    /// Body of the current result set.
    current: Option<BufReader<R>>,
    /// Bodies of the following result sets.
    remaining: VecDeque<R>,
    params: StreamParams,
    /// Reused line buffer.
    line: Vec<u8>,
    state: SegmentState,
    /// Columns from the current START record.
    column_info: Option<Arc<ColumnInfo>>,
    /// Undecoded rows of the last DATA block.
    block: std::vec::IntoIter<Vec<Value>>,
    result_set: usize,
    query_id: Option<String>,
    query_label: Option<String>,
    statistics: Option<Statistics>,
    rows_returned: u64,
    closed: bool,
}

impl<R: AsyncRead + Unpin + Send> StreamingRows<R> {
    /// Create a cursor over `segments` with default parameters.
    pub fn new(segments: Vec<R>) -> Self {
        Self::with_params(segments, StreamParams::default())
    }

    /// Create a cursor over `segments`.
    ///
    /// With no segments the cursor starts closed.
    pub fn with_params(segments: Vec<R>, params: StreamParams) -> Self {
        let mut remaining: VecDeque<R> = segments.into();
        let current = remaining.pop_front().map(BufReader::new);
        let closed = current.is_none();
        Self {
            current,
            remaining,
            params,
            line: Vec::with_capacity(params.line_capacity),
            state: SegmentState::AwaitingStart,
            column_info: None,
            block: Vec::new().into_iter(),
            result_set: 0,
            query_id: None,
            query_label: None,
            statistics: None,
            rows_returned: 0,
            closed,
        }
    }

    /// Index of the current result set (0-based).
    pub fn result_set_index(&self) -> usize {
        self.result_set
    }

    /// Query id from the current START record.
    pub fn query_id(&self) -> Option<&str> {
        self.query_id.as_deref()
    }

    /// Query label from the current START record.
    pub fn query_label(&self) -> Option<&str> {
        self.query_label.as_deref()
    }

    /// Statistics from the current FINISHED_WITH_SUCCESS record.
    pub fn statistics(&self) -> Option<&Statistics> {
        self.statistics.as_ref()
    }

    /// Read the next non-blank record of the current segment.
    ///
    /// Returns `Ok(None)` at end of the body.
    async fn read_record(&mut self) -> Result<Option<StreamRecord>> {
        let reader = self.current.as_mut().ok_or(Error::CursorClosed)?;
        let limit = self.params.max_line_length;

        loop {
            self.line.clear();
            // One byte past the limit (plus a CRLF) is enough to detect an oversized record.
            let budget = (limit as u64).saturating_add(3);
            let n = (&mut *reader)
                .take(budget)
                .read_until(b'\n', &mut self.line)
                .await?;
            if n == 0 {
                return Ok(None);
            }

            let record = trim_line(&self.line);
            if record.len() > limit {
                return Err(Error::LineTooLong { limit });
            }
            if record.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            return StreamRecord::parse(record).map(Some);
        }
    }

    /// Read START for the current segment if it has not been read yet.
    async fn ensure_started(&mut self) -> Result<()> {
        if self.closed {
            return Err(Error::CursorClosed);
        }
        if self.state != SegmentState::AwaitingStart {
            return Ok(());
        }

        let record = match self.read_record().await {
            Ok(Some(record)) => record,
            Ok(None) => {
                self.state = SegmentState::Exhausted;
                return Err(Error::protocol("response ended before START"));
            }
            Err(e) => {
                self.state = SegmentState::Exhausted;
                return Err(e);
            }
        };

        match record.message_type {
            MessageType::Start => {
                let info = match ColumnInfo::from_metadata(&record.result_columns) {
                    Ok(info) => info,
                    Err(e) => {
                        self.state = SegmentState::Exhausted;
                        return Err(e);
                    }
                };
                debug!(
                    result_set = self.result_set,
                    columns = info.len(),
                    query_id = record.query_id.as_deref(),
                    "result set started"
                );
                self.column_info = Some(Arc::new(info));
                self.query_id = record.query_id;
                self.query_label = record.query_label;
                self.state = SegmentState::Reading;
                Ok(())
            }
            other => {
                let err = self.unexpected(other, record.errors);
                self.state = SegmentState::Exhausted;
                Err(err)
            }
        }
    }

    /// Error for a record that is not valid at this point of the segment.
    fn unexpected(&self, kind: MessageType, errors: Vec<ErrorDetails>) -> Error {
        match kind {
            MessageType::FinishWithError => {
                warn!(
                    result_set = self.result_set,
                    count = errors.len(),
                    "server reported errors"
                );
                Error::Server { errors }
            }
            MessageType::Start => Error::protocol("unexpected START inside a result set"),
            MessageType::Data => Error::protocol("DATA received before START"),
            MessageType::FinishedWithSuccess if self.state == SegmentState::AwaitingStart => {
                Error::protocol("FINISHED_WITH_SUCCESS received before START")
            }
            other => Error::protocol(format!("unexpected message type {}", other)),
        }
    }

    fn release_current(&mut self) {
        if self.current.take().is_some() {
            debug!(result_set = self.result_set, "closed result set body");
        }
        self.block = Vec::new().into_iter();
        self.column_info = None;
        self.query_id = None;
        self.query_label = None;
        self.statistics = None;
    }
}

/// Strip the line terminator (`\n` or `\r\n`).
fn trim_line(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

impl<R: AsyncRead + Unpin + Send> Cursor for StreamingRows<R> {
    async fn columns(&mut self) -> Result<Arc<ColumnInfo>> {
        self.ensure_started().await?;
        self.column_info
            .clone()
            .ok_or_else(|| Error::protocol("result set has no column metadata"))
    }

    fn rowcount(&self) -> u64 {
        self.rows_returned
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn has_next_result_set(&self) -> bool {
        !self.closed && !self.remaining.is_empty()
    }

    async fn next(&mut self) -> Result<Option<Row>> {
        if self.closed {
            return Ok(None);
        }
        self.ensure_started().await?;

        loop {
            if let Some(raw) = self.block.next() {
                let info = self
                    .column_info
                    .clone()
                    .ok_or_else(|| Error::protocol("DATA received before START"))?;
                let values = decode_row(&info, raw)?;
                self.rows_returned += 1;
                return Ok(Some(Row::new(values, info)));
            }
            if self.state != SegmentState::Reading {
                return Ok(None);
            }

            let record = match self.read_record().await {
                Ok(Some(record)) => record,
                Ok(None) => {
                    self.state = SegmentState::Exhausted;
                    return Err(Error::protocol(
                        "response ended before FINISHED_WITH_SUCCESS",
                    ));
                }
                Err(e) => {
                    self.state = SegmentState::Exhausted;
                    return Err(e);
                }
            };

            match record.message_type {
                MessageType::Data => {
                    trace!(rows = record.data.len(), "data block");
                    self.block = record.data.into_iter();
                }
                MessageType::FinishedWithSuccess => {
                    debug!(
                        result_set = self.result_set,
                        rows = self.rows_returned,
                        "result set finished"
                    );
                    self.state = SegmentState::Exhausted;
                    self.statistics = record.statistics;
                    return Ok(None);
                }
                other => {
                    let err = self.unexpected(other, record.errors);
                    self.state = SegmentState::Exhausted;
                    return Err(err);
                }
            }
        }
    }

    async fn next_result_set(&mut self) -> Result<bool> {
        if self.closed {
            return Ok(false);
        }
        self.release_current();

        match self.remaining.pop_front() {
            Some(body) => {
                self.current = Some(BufReader::new(body));
                self.state = SegmentState::AwaitingStart;
                self.result_set += 1;
                debug!(result_set = self.result_set, "advanced to next result set");
                self.ensure_started().await?;
                Ok(true)
            }
            None => {
                self.state = SegmentState::Exhausted;
                self.closed = true;
                debug!("no result sets left");
                Ok(false)
            }
        }
    }

    async fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        let unread = self.remaining.len();
        self.release_current();
        self.remaining.clear();
        self.state = SegmentState::Exhausted;
        self.closed = true;
        debug!(unread, rows = self.rows_returned, "closed streaming rows");
        Ok(())
    }
}
