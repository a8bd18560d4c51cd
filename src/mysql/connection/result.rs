//! `ResultSet`: a row cursor over an open `COM_QUERY`/`COM_STMT_EXECUTE` response.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::io::Encode as PacketEncode;
use crate::log::LogEvent;
use crate::mysql::column::MySqlColumn;
use crate::mysql::connection::{ConnectionState, MySqlConnection};
use crate::mysql::protocol::{Capabilities, ComStmtFetch, EofPacket, OkPacket, Status, TypeId};
use crate::mysql::row::MySqlRow;
use crate::mysql::value::{Decode, MySqlValueFormat};

/// Which command produced this result set, so `next()` knows how to decode a row packet.
#[derive(Clone)]
pub(crate) enum RowFormat {
    Text,
    Binary { column_types: Arc<[TypeId]> },
}

impl RowFormat {
    pub(crate) fn is_binary(&self) -> bool {
        matches!(self, RowFormat::Binary { .. })
    }
}

/// One step of a multi-result-set response: a stored procedure call can interleave
/// row-producing result sets with plain `OK` results
/// (e.g. one per non-`SELECT` statement it runs), terminating in an `OK` carrying
/// `SERVER_PS_OUT_PARAMS` when the call has `OUT`/`INOUT` parameters to report back.
pub enum MySqlResultStep<'c> {
    Rows(MySqlResultSet<'c>),
    Affected { affected_rows: u64, out_params: bool },
}

/// Tracks a server-side cursor opened with `CursorType::READ_ONLY`: once the buffered rows in
/// a `COM_STMT_FETCH` batch run out, `next()` asks for another batch instead of finishing.
struct CursorFetch {
    statement_id: u32,
    fetch_size: u32,
}

/// A streamed result set: `next()` pulls one row packet at a time off
/// the wire, leaving the connection in [`ConnectionState::InQuery`] until exhausted or closed.
pub struct MySqlResultSet<'c> {
    conn: &'c mut MySqlConnection,
    columns: Arc<[MySqlColumn]>,
    format: RowFormat,
    current: Option<MySqlRow>,
    finished: bool,
    /// `true` once the terminating OK carried `SERVER_MORE_RESULTS_EXISTS`; surfaced through [`Self::has_more_results`].
    more_results: bool,
    cursor: Option<CursorFetch>,
    sql: Box<str>,
}

impl<'c> MySqlResultSet<'c> {
    pub(crate) fn new(
        conn: &'c mut MySqlConnection,
        columns: Arc<[MySqlColumn]>,
        format: RowFormat,
        sql: &str,
    ) -> Self {
        conn.state = ConnectionState::InQuery;
        Self {
            conn,
            columns,
            format,
            current: None,
            finished: false,
            more_results: false,
            cursor: None,
            sql: sql.into(),
        }
    }

    /// Marks this result set as backed by a server-side cursor opened on `statement_id`:
    /// once a `COM_STMT_FETCH` batch of `fetch_size` rows runs dry, `next()` requests another
    /// batch instead of finishing, until the server reports `SERVER_STATUS_LAST_ROW_SENT`.
    pub(crate) fn open_cursor(&mut self, statement_id: u32, fetch_size: u32) {
        self.cursor = Some(CursorFetch { statement_id, fetch_size });
    }

    pub fn columns(&self) -> &[MySqlColumn] {
        &self.columns
    }

    /// `next() → bool`: advances to the next row, `false` once exhausted.
    pub async fn next(&mut self) -> Result<bool> {
        if self.finished {
            return Ok(false);
        }

        loop {
            let packet = self.conn.stream.read_packet().await.map_err(|e| {
                self.finished = true;
                e
            })?;

            let header = packet.first().copied();
            let deprecate_eof = self.conn.capabilities.contains(Capabilities::DEPRECATE_EOF);

            let is_terminator = match header {
                Some(0xfe) if !deprecate_eof => true,
                Some(h) if deprecate_eof && OkPacket::looks_like_eof(h, packet.len(), self.conn.capabilities) => true,
                _ => false,
            };

            if is_terminator {
                let status = if deprecate_eof {
                    OkPacket::read(packet, self.conn.capabilities)?.status
                } else {
                    EofPacket::decode(packet)?.status
                };

                if let Some(cursor) = &self.cursor {
                    if status.contains(Status::SERVER_STATUS_CURSOR_EXISTS)
                        && !status.contains(Status::SERVER_STATUS_LAST_ROW_SENT)
                    {
                        let fetch = ComStmtFetch { statement_id: cursor.statement_id, rows: cursor.fetch_size };
                        let mut buf = Vec::new();
                        fetch.encode(&mut buf, self.conn.capabilities);
                        self.conn.stream.reset_sequence();
                        self.conn.stream.write_packet(&buf).await?;
                        continue;
                    }
                }

                self.more_results = status.contains(Status::SERVER_MORE_RESULTS_EXISTS);
                self.finished = true;
                self.current = None;

                if self.more_results {
                    // Another result set (or a trailing `OK`) follows on the wire; the connection
                    // stays busy until `MySqlConnection::next_result` drains it, matching
                    // "issuing a command while a result set is open is an error" for the chain as
                    // a whole.
                    self.conn.state = ConnectionState::InQuery;
                    self.conn.pending_multi_result = Some(self.format.clone());
                } else {
                    self.conn.state = ConnectionState::Idle;
                    self.conn.pending_multi_result = None;
                }

                return Ok(false);
            }

            let row = match &self.format {
                RowFormat::Text => MySqlRow::from_text(packet, self.columns.clone())?,
                RowFormat::Binary { column_types } => {
                    MySqlRow::from_binary(packet, self.columns.clone(), column_types)?
                }
            };

            self.current = Some(row);
            return Ok(true);
        }
    }

    /// The current row; call after [`Self::next`] returns
    /// `true`.
    pub fn row(&self) -> Result<&MySqlRow> {
        self.current
            .as_ref()
            .ok_or_else(|| Error::client_state("no current row; call next() first"))
    }

    pub fn get<'r, T>(&'r self, index: usize) -> Result<T>
    where
        T: Decode<'r>,
    {
        self.row()?.try_get(index)
    }

    pub fn get_by_name<'r, T>(&'r self, name: &str) -> Result<T>
    where
        T: Decode<'r>,
    {
        self.row()?.try_get_by_name(name)
    }

    pub fn was_null(&self, index: usize) -> Result<bool> {
        self.row()?.is_null(index)
    }

    pub fn format(&self) -> MySqlValueFormat {
        match self.format {
            RowFormat::Text => MySqlValueFormat::Text,
            RowFormat::Binary { .. } => MySqlValueFormat::Binary,
        }
    }

    /// `true` if the terminating status carried `SERVER_MORE_RESULTS_EXISTS`.
    /// Only meaningful once this result set is exhausted.
    pub fn has_more_results(&self) -> bool {
        self.more_results
    }

    /// `close()`: drains any unread rows. The connection returns to `Idle` unless this result
    /// set was one step of a chain with more steps left, in which case `next_result` must be
    /// called (possibly repeatedly) before a new command can be issued.
    pub async fn close(mut self) -> Result<()> {
        while self.next().await? {}
        Ok(())
    }
}

impl Drop for MySqlResultSet<'_> {
    fn drop(&mut self) {
        if !self.finished {
            // The caller dropped the result set without consuming it; the connection cannot be
            // trusted to be at a packet boundary any more, so it
            // is left poisoned rather than silently resynchronized.
            self.conn.stream.mark_poisoned(Error::client_state(
                "result set dropped without being fully consumed or explicitly closed",
            ));
            self.conn.state = ConnectionState::Closed;
            self.conn.log(LogEvent::ProcessingFailure {
                sql: &self.sql,
                elapsed: std::time::Duration::ZERO,
                cause: &Error::client_state("result set dropped while rows remained unread"),
            });
        }
    }
}
