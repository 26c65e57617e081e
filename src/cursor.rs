//! Cursor contract shared by the buffered and streaming row sources.
//!
//! A cursor walks one or more result sets in order. Within a result set,
//! `next()` yields rows until it returns `Ok(None)`; it never moves to the
//! following result set on its own. `next_result_set()` does that, and once
//! the last result set is passed the cursor is closed.
//!
//! ```text
//! Active(0) --next_result_set--> Active(1) --...--> Active(n)
//!     |                                                 |
//!   close()                                 next_result_set() / close()
//!     v                                                 v
//!   Closed <--------------------------------------------+
//! ```

use futures::Stream;
use std::future::Future;
use std::sync::Arc;

use crate::error::Result;
use crate::protocol::types::{ColumnInfo, FireboltValue, Row};

/// Base trait for row cursors.
///
/// # Example
///
/// ```no_run
/// use firebolt_thin_rs::{BufferedRows, Cursor};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let body = br#"{"meta":[{"name":"x","type":"int"}],"data":[[1],[2]]}"#;
///     let mut rows = BufferedRows::from_body(bytes::Bytes::from_static(body))?;
///
///     // Generic function that works with any cursor type
///     async fn count_rows<C: Cursor>(cursor: &mut C) -> u64 {
///         let mut count = 0;
///         while let Some(_) = cursor.next().await.unwrap() {
///             count += 1;
///         }
///         count
///     }
///
///     assert_eq!(count_rows(&mut rows).await, 2);
///     Ok(())
/// }
/// ```
pub trait Cursor {
    /// Columns of the current result set.
    ///
    /// Fails with `Error::CursorClosed` once the cursor is closed.
    fn columns(&mut self) -> impl Future<Output = Result<Arc<ColumnInfo>>> + Send;

    /// Number of rows returned so far, across result sets.
    fn rowcount(&self) -> u64;

    /// Check if the cursor is closed.
    fn is_closed(&self) -> bool;

    /// Whether another result set follows the current one.
    fn has_next_result_set(&self) -> bool;

    /// Decode the next row of the current result set.
    ///
    /// Returns `Ok(None)` when the result set is exhausted or the cursor is
    /// closed. A row that fails to decode is reported as an error and never
    /// returned partially.
    fn next(&mut self) -> impl Future<Output = Result<Option<Row>>> + Send;

    /// Decode the next row into `dest`.
    ///
    /// Returns `Ok(false)` at end of data. `dest` is only replaced when a
    /// whole row decoded.
    fn next_into(
        &mut self,
        dest: &mut Vec<FireboltValue>,
    ) -> impl Future<Output = Result<bool>> + Send
    where
        Self: Send,
    {
        async move {
            match self.next().await? {
                Some(row) => {
                    dest.clear();
                    dest.extend(row);
                    Ok(true)
                }
                None => Ok(false),
            }
        }
    }

    /// Advance to the next result set, resetting columns and row position.
    ///
    /// Returns `Ok(false)` and closes the cursor when no result set is left.
    fn next_result_set(&mut self) -> impl Future<Output = Result<bool>> + Send;

    /// Close the cursor and release any response bodies. Idempotent.
    fn close(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Fetch the remaining rows of the current result set.
    fn fetch_all(&mut self) -> impl Future<Output = Result<Vec<Row>>> + Send
    where
        Self: Send,
    {
        async move {
            let mut rows = Vec::new();
            while let Some(row) = self.next().await? {
                rows.push(row);
            }
            Ok(rows)
        }
    }
}

/// Extension trait for converting a Cursor to a Stream.
///
/// # Example
///
/// ```no_run
/// use firebolt_thin_rs::{BufferedRows, CursorStreamExt};
/// use futures::stream::TryStreamExt;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let body = br#"{"meta":[{"name":"name","type":"text"}],"data":[["a"],["b"]]}"#;
///     let rows = BufferedRows::from_body(bytes::Bytes::from_static(body))?;
///
///     let names: Vec<String> = rows.into_stream()
///         .map_ok(|row| row.get(0).unwrap().to_string())
///         .try_collect()
///         .await?;
///
///     Ok(())
/// }
/// ```
pub trait CursorStreamExt: Cursor + Sized {
    /// Convert this cursor into a Stream over the current result set.
    ///
    /// The stream takes ownership of the cursor and ends with the result
    /// set. After an error the stream ends.
    fn into_stream(self) -> impl Stream<Item = Result<Row>>;
}

impl<C: Cursor + Unpin> CursorStreamExt for C {
    fn into_stream(self) -> impl Stream<Item = Result<Row>> {
        use futures::stream;

        stream::unfold(Some(self), |opt_cursor| async move {
            let mut cursor = opt_cursor?;
            match cursor.next().await {
                Ok(Some(row)) => Some((Ok(row), Some(cursor))),
                Ok(None) => None,
                Err(e) => Some((Err(e), None)),
            }
        })
    }
}
