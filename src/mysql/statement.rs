//! `PreparedStatement`: a server-side statement handle bound to parameters and
//! re-executed through `COM_STMT_EXECUTE`.

use crate::error::{Error, Result};
use crate::mysql::arguments::MySqlArguments;
use crate::mysql::connection::executor::{self, ExecOutcome};
use crate::mysql::connection::{MySqlConnection, MySqlResultSet};
use crate::mysql::protocol::TypeId;
use crate::mysql::value::Encode;

/// A prepared statement, exclusively borrowing the connection it
/// was prepared on -- the same borrow-checker-enforced "one command at a time" discipline as
/// [`MySqlResultSet`].
pub struct MySqlStatement<'c> {
    conn: &'c mut MySqlConnection,
    statement_id: u32,
    num_params: usize,
    /// The server caches bound parameter types after the first execution; only the first
    /// `COM_STMT_EXECUTE` needs to send them again.
    types_sent: bool,
    current: MySqlArguments,
    batch: Vec<MySqlArguments>,
    closed: bool,
}

impl<'c> MySqlStatement<'c> {
    pub(crate) fn new(conn: &'c mut MySqlConnection, statement_id: u32, num_params: usize) -> Self {
        Self {
            conn,
            statement_id,
            num_params,
            types_sent: false,
            current: MySqlArguments::new(),
            batch: Vec::new(),
            closed: false,
        }
    }

    pub fn num_params(&self) -> usize {
        self.num_params
    }

    /// `set_<type>(index1based, value)`: binds one parameter of the execution
    /// currently being built.
    pub fn set<T: Encode>(&mut self, index1based: usize, value: T) {
        self.current.set(index1based, value);
    }

    pub fn set_null(&mut self, index1based: usize) {
        self.current.set_null(index1based);
    }

    /// `send_long_data(index, chunk)`: streams `chunk` to the server as (part of) the value
    /// for parameter `index1based` via `COM_STMT_SEND_LONG_DATA`, instead of binding it inline
    /// with [`Self::set`]. Callable repeatedly to append further chunks before execution; the
    /// accumulated value is treated as a string/blob and is excluded from the inline parameter
    /// bytes `execute_query`/`execute_update` would otherwise send for this index.
    pub async fn send_long_data(&mut self, index1based: usize, chunk: &[u8]) -> Result<()> {
        assert!(
            index1based >= 1 && index1based <= self.num_params,
            "parameter index out of range"
        );

        self.current.mark_long_data(index1based, TypeId::BLOB);
        executor::send_long_data(&mut *self.conn, self.statement_id, (index1based - 1) as u16, chunk).await
    }

    /// `add_batch()`: freezes the currently bound parameters as one batch entry and
    /// clears the binding for the next one.
    pub fn add_batch(&mut self) {
        self.batch.push(std::mem::take(&mut self.current));
    }

    /// `execute_query() → ResultSet`: errors if the statement didn't produce rows.
    pub async fn execute_query(&mut self) -> Result<MySqlResultSet<'_>> {
        let send_types = !self.types_sent;

        match executor::execute_statement(&mut *self.conn, self.statement_id, &self.current, send_types).await? {
            ExecOutcome::Rows(rs) => {
                self.types_sent = true;
                Ok(rs)
            }
            ExecOutcome::Affected(_) => Err(Error::client_state(
                "prepared statement did not produce a result set; use execute_update() instead",
            )),
        }
    }

    /// `execute_query_with_cursor(fetch_size) → ResultSet`: like [`Self::execute_query`], but
    /// opens a read-only server-side cursor instead of streaming rows back inline -- rows are
    /// paged in batches of `fetch_size` via `COM_STMT_FETCH`, transparently to the returned
    /// [`MySqlResultSet`]'s [`MySqlResultSet::next`]. Useful for result sets too large to want
    /// buffered server-side in one inline response.
    pub async fn execute_query_with_cursor(&mut self, fetch_size: u32) -> Result<MySqlResultSet<'_>> {
        let send_types = !self.types_sent;

        match executor::execute_statement_with_cursor(
            &mut *self.conn,
            self.statement_id,
            &self.current,
            send_types,
            Some(fetch_size),
        )
        .await?
        {
            ExecOutcome::Rows(rs) => {
                self.types_sent = true;
                Ok(rs)
            }
            ExecOutcome::Affected(_) => Err(Error::client_state(
                "prepared statement did not produce a result set; use execute_update() instead",
            )),
        }
    }

    /// `execute_update() → u64`: errors if the statement produced a result set.
    pub async fn execute_update(&mut self) -> Result<u64> {
        let send_types = !self.types_sent;

        match executor::execute_statement(&mut *self.conn, self.statement_id, &self.current, send_types).await? {
            ExecOutcome::Affected(ok) => {
                self.types_sent = true;
                Ok(ok.affected_rows)
            }
            ExecOutcome::Rows(mut rs) => {
                while rs.next().await? {}
                Err(Error::client_state(
                    "prepared statement produced a result set; use execute_query() instead",
                ))
            }
        }
    }

    /// `execute_batch() → Vec<u64>`: runs every batched binding in order, stopping
    /// at the first error (earlier affected-rows counts are discarded along with it, matching
    /// the "first failure aborts the batch" behaviour of `execute_update`).
    pub async fn execute_batch(&mut self) -> Result<Vec<u64>> {
        let batch = std::mem::take(&mut self.batch);
        let mut results = Vec::with_capacity(batch.len());

        for args in &batch {
            let send_types = !self.types_sent;

            match executor::execute_statement(&mut *self.conn, self.statement_id, args, send_types).await? {
                ExecOutcome::Affected(ok) => {
                    self.types_sent = true;
                    results.push(ok.affected_rows);
                }
                ExecOutcome::Rows(mut rs) => {
                    while rs.next().await? {}
                    return Err(Error::client_state(
                        "batched statement produced a result set; prepared batches must be updates",
                    ));
                }
            }
        }

        Ok(results)
    }

    /// `close()`: sends `COM_STMT_CLOSE`, which the
    /// server never acknowledges.
    pub async fn close(mut self) -> Result<()> {
        executor::close_statement(&mut *self.conn, self.statement_id).await?;
        self.closed = true;
        Ok(())
    }
}

impl Drop for MySqlStatement<'_> {
    fn drop(&mut self) {
        // `COM_STMT_CLOSE` is fire-and-forget and this destructor cannot `.await`; an
        // unclosed handle leaks the server-side statement until the connection itself resets
        // or closes, rather than corrupting the
        // stream the way an unread `ResultSet` would.
        let _ = self.closed;
    }
}
