//! Command dispatch: encodes a `COM_*` packet, reads the response head, and hands
//! back either a scalar outcome or a streamed [`MySqlResultSet`].

use std::sync::Arc;
use std::time::Instant;

use crate::error::{Error, Result};
use crate::io::{Decode as PacketDecode, Encode as PacketEncode};
use crate::log::LogEvent;
use crate::mysql::arguments::MySqlArguments;
use crate::mysql::column::MySqlColumn;
use crate::mysql::connection::result::{MySqlResultSet, MySqlResultStep, RowFormat};
use crate::mysql::connection::{ConnectionState, MySqlConnection};
use crate::mysql::error::MySqlDatabaseError;
use crate::mysql::protocol::{
    ColumnCount, ColumnDefinition41, ComPing, ComQuery, ComQuit, ComResetConnection,
    ComStmtClose, ComStmtExecute, ComStmtPrepare, ComStmtPrepareOk, ComStmtSendLongData,
    Capabilities, CursorType, EofPacket, ErrPacket, OkPacket, Status,
};
use crate::mysql::statement::MySqlStatement;

/// Encodes `command` with a freshly reset sequence counter and writes it.
async fn send<E: PacketEncode>(conn: &mut MySqlConnection, command: &E) -> Result<()> {
    let mut buf = Vec::new();
    command.encode(&mut buf, conn.capabilities);
    conn.stream.reset_sequence();
    conn.stream.write_packet(&buf).await
}

/// The head of a `COM_QUERY`/`COM_STMT_EXECUTE` response,
/// stripped of the `LOCAL_INFILE` detour which is resolved (refused) before this returns.
enum ResponseHead {
    Ok(OkPacket),
    ResultSetColumns(Vec<MySqlColumn>, Vec<crate::mysql::protocol::TypeId>),
}

/// Reads and classifies the first packet of a command response, consuming the column
/// definitions (and trailing `EOF`, if `!DEPRECATE_EOF`) of a `ResultSet` header before
/// returning.
async fn read_response_head(conn: &mut MySqlConnection) -> Result<ResponseHead> {
    let packet = conn.stream.read_packet().await?;

    match packet.first().copied() {
        Some(0x00) => Ok(ResponseHead::Ok(OkPacket::read(packet, conn.capabilities)?)),

        Some(0xff) => {
            let err = ErrPacket::decode(packet)?;
            Err(Error::Database(Box::new(MySqlDatabaseError::from_err_packet(err))))
        }

        // `LOCAL_INFILE`: this client never negotiates the feature it would need
        // to honour a file transfer, so it always refuses -- an empty packet tells the server
        // to treat the request as failed, and the subsequent `ERR` is propagated normally.
        Some(0xfb) => {
            conn.stream.write_packet(&[]).await?;
            let packet = conn.stream.read_packet().await?;
            let err = ErrPacket::decode(packet)?;
            Err(Error::Database(Box::new(MySqlDatabaseError::from_err_packet(err))))
        }

        _ => {
            let column_count = ColumnCount::decode(packet)?.columns as usize;
            let mut columns = Vec::with_capacity(column_count);
            let mut types = Vec::with_capacity(column_count);

            for ordinal in 0..column_count {
                let packet = conn.stream.read_packet().await?;
                let def = ColumnDefinition41::decode(packet)?;
                types.push(def.column_type);
                columns.push(MySqlColumn::from_definition(ordinal, def));
            }

            if column_count > 0 && !conn.capabilities.contains(Capabilities::DEPRECATE_EOF) {
                let packet = conn.stream.read_packet().await?;
                EofPacket::decode(packet)?;
            }

            Ok(ResponseHead::ResultSetColumns(columns, types))
        }
    }
}

/// Drains an already-open result set so the connection returns to `Idle`, without surfacing
/// the rows -- used where a caller's statement produced a `ResultSet` it didn't ask for.
async fn drain(conn: &mut MySqlConnection, columns: Vec<MySqlColumn>, format: RowFormat, sql: &str) -> Result<()> {
    let mut rs = MySqlResultSet::new(conn, columns.into(), format, sql);
    while rs.next().await? {}
    Ok(())
}

/// `Statement::execute_query(sql) → ResultSet`: the text protocol (`COM_QUERY`).
pub(crate) async fn query<'c>(conn: &'c mut MySqlConnection, sql: &str) -> Result<MySqlResultSet<'c>> {
    let started = Instant::now();

    if let Err(e) = send(conn, &ComQuery { sql }).await {
        conn.log(LogEvent::ExecFailure { sql, elapsed: started.elapsed(), cause: &e });
        return Err(e);
    }

    match read_response_head(conn).await {
        Ok(ResponseHead::Ok(ok)) => {
            set_pending_multi_result(conn, &ok, RowFormat::Text);
            conn.log(LogEvent::Success { sql, rows_affected: ok.affected_rows, elapsed: started.elapsed() });
            Err(Error::client_state(
                "statement did not produce a result set; use execute() instead of query()",
            ))
        }
        Ok(ResponseHead::ResultSetColumns(columns, _types)) => {
            conn.log(LogEvent::Success { sql, rows_affected: 0, elapsed: started.elapsed() });
            Ok(MySqlResultSet::new(conn, columns.into(), RowFormat::Text, sql))
        }
        Err(e) => {
            conn.state = ConnectionState::Idle;
            conn.log(LogEvent::ExecFailure { sql, elapsed: started.elapsed(), cause: &e });
            Err(e)
        }
    }
}

/// `Statement::execute_update(sql) → u64`.
pub(crate) async fn execute(conn: &mut MySqlConnection, sql: &str) -> Result<u64> {
    let started = Instant::now();

    if let Err(e) = send(conn, &ComQuery { sql }).await {
        conn.log(LogEvent::ExecFailure { sql, elapsed: started.elapsed(), cause: &e });
        return Err(e);
    }

    let result = match read_response_head(conn).await {
        Ok(ResponseHead::Ok(ok)) => {
            set_pending_multi_result(conn, &ok, RowFormat::Text);
            Ok(ok.affected_rows)
        }
        Ok(ResponseHead::ResultSetColumns(columns, _types)) => {
            drain(conn, columns, RowFormat::Text, sql).await?;
            Err(Error::client_state(
                "statement produced a result set; use query() instead of execute()",
            ))
        }
        Err(e) => {
            conn.state = ConnectionState::Idle;
            Err(e)
        }
    };

    match &result {
        Ok(affected) => conn.log(LogEvent::Success { sql, rows_affected: *affected, elapsed: started.elapsed() }),
        Err(e) => conn.log(LogEvent::ExecFailure { sql, elapsed: started.elapsed(), cause: e }),
    }

    result
}

/// `Statement::execute(sql) → bool`: `true` iff a result set was produced; any rows
/// are drained rather than exposed, since this entry point reports presence only.
pub(crate) async fn execute_returning_bool(conn: &mut MySqlConnection, sql: &str) -> Result<bool> {
    let started = Instant::now();
    send(conn, &ComQuery { sql }).await?;

    let result = match read_response_head(conn).await {
        Ok(ResponseHead::Ok(ok)) => {
            set_pending_multi_result(conn, &ok, RowFormat::Text);
            conn.log(LogEvent::Success { sql, rows_affected: ok.affected_rows, elapsed: started.elapsed() });
            Ok(false)
        }
        Ok(ResponseHead::ResultSetColumns(columns, _types)) => {
            drain(conn, columns, RowFormat::Text, sql).await?;
            conn.log(LogEvent::Success { sql, rows_affected: 0, elapsed: started.elapsed() });
            Ok(true)
        }
        Err(e) => {
            conn.state = ConnectionState::Idle;
            conn.log(LogEvent::ExecFailure { sql, elapsed: started.elapsed(), cause: &e });
            Err(e)
        }
    };

    result
}

/// Shared by `query`/`execute`/`execute_returning_bool`: leaves the connection busy and
/// remembers the row format for [`MySqlConnection::next_result`] when the `OK` that just came
/// back still has more steps of the chain to read.
fn set_pending_multi_result(conn: &mut MySqlConnection, ok: &OkPacket, format: RowFormat) {
    if ok.status.contains(Status::SERVER_MORE_RESULTS_EXISTS) {
        conn.state = ConnectionState::InQuery;
        conn.pending_multi_result = Some(format);
    } else {
        conn.state = ConnectionState::Idle;
        conn.pending_multi_result = None;
    }
}

/// `prepare_statement(sql) → PreparedStatement`.
pub(crate) async fn prepare<'c>(conn: &'c mut MySqlConnection, sql: &str) -> Result<MySqlStatement<'c>> {
    send(conn, &ComStmtPrepare { sql }).await?;

    let packet = conn.stream.read_packet().await?;

    if packet.first().copied() == Some(0xff) {
        conn.state = ConnectionState::Idle;
        let err = ErrPacket::decode(packet)?;
        return Err(Error::Database(Box::new(MySqlDatabaseError::from_err_packet(err))));
    }

    let prepare_ok = ComStmtPrepareOk::read(packet)?;
    let deprecate_eof = conn.capabilities.contains(Capabilities::DEPRECATE_EOF);

    for _ in 0..prepare_ok.num_params {
        conn.stream.read_packet().await?;
    }
    if prepare_ok.num_params > 0 && !deprecate_eof {
        conn.stream.read_packet().await?;
    }

    for _ in 0..prepare_ok.num_columns {
        conn.stream.read_packet().await?;
    }
    if prepare_ok.num_columns > 0 && !deprecate_eof {
        conn.stream.read_packet().await?;
    }

    conn.state = ConnectionState::Idle;

    Ok(MySqlStatement::new(conn, prepare_ok.statement_id, prepare_ok.num_params as usize))
}

/// Outcome of one `COM_STMT_EXECUTE`.
pub(crate) enum ExecOutcome<'c> {
    Affected(OkPacket),
    Rows(MySqlResultSet<'c>),
}

/// Runs one bound execution of a prepared statement; `send_types`
/// is `true` only the first time a statement is executed (the server caches bound types after).
pub(crate) async fn execute_statement<'c>(
    conn: &'c mut MySqlConnection,
    statement_id: u32,
    args: &MySqlArguments,
    send_types: bool,
) -> Result<ExecOutcome<'c>> {
    execute_statement_with_cursor(conn, statement_id, args, send_types, None).await
}

/// `execute_statement`, optionally opening a read-only server-side cursor (`Some(fetch_size)`)
/// instead of having rows streamed back inline.
pub(crate) async fn execute_statement_with_cursor<'c>(
    conn: &'c mut MySqlConnection,
    statement_id: u32,
    args: &MySqlArguments,
    send_types: bool,
    cursor_fetch_size: Option<u32>,
) -> Result<ExecOutcome<'c>> {
    let (null_bitmap, param_types, params) = args.encode_for_execute(send_types);

    let cursor_type = if cursor_fetch_size.is_some() {
        CursorType::READ_ONLY
    } else {
        CursorType::NO_CURSOR
    };

    let command = ComStmtExecute {
        statement_id,
        cursor_type,
        null_bitmap: &null_bitmap,
        param_types: param_types.as_deref(),
        params: &params,
    };

    send(conn, &command).await?;

    match read_response_head(conn).await? {
        ResponseHead::Ok(ok) => {
            // Only `is_binary()` of this placeholder format is ever consulted if a chain
            // continues from here; the real column types for the next step come from its own
            // `ColumnDefinition41`s.
            set_pending_multi_result(conn, &ok, RowFormat::Binary { column_types: Arc::from([]) });
            Ok(ExecOutcome::Affected(ok))
        }
        ResponseHead::ResultSetColumns(columns, types) => {
            let format = RowFormat::Binary { column_types: types.into() };
            let mut rs = MySqlResultSet::new(conn, columns.into(), format, "<prepared statement>");

            if let Some(fetch_size) = cursor_fetch_size {
                rs.open_cursor(statement_id, fetch_size);
            }

            Ok(ExecOutcome::Rows(rs))
        }
    }
}

/// `COM_STMT_SEND_LONG_DATA`: appends `chunk` to the server-side buffer for parameter
/// `param_id` (0-based), to be consumed by the next `COM_STMT_EXECUTE` on this statement. The
/// server never replies, even on error.
pub(crate) async fn send_long_data(
    conn: &mut MySqlConnection,
    statement_id: u32,
    param_id: u16,
    chunk: &[u8],
) -> Result<()> {
    send(conn, &ComStmtSendLongData { statement_id, param_id, data: chunk }).await
}

/// Reads the next step of an open multi-result-set chain (`MySqlConnection::next_result`):
/// either another row-producing result set in the same protocol (text/binary) as the command
/// that started the chain, or a plain affected-rows outcome possibly carrying `OUT`/`INOUT`
/// parameters (`SERVER_PS_OUT_PARAMS`).
pub(crate) async fn next_result_set<'c>(
    conn: &'c mut MySqlConnection,
    format: RowFormat,
) -> Result<MySqlResultStep<'c>> {
    let is_binary = format.is_binary();

    match read_response_head(conn).await? {
        ResponseHead::Ok(ok) => {
            if ok.status.contains(Status::SERVER_MORE_RESULTS_EXISTS) {
                conn.state = ConnectionState::InQuery;
                conn.pending_multi_result = Some(format);
            } else {
                conn.state = ConnectionState::Idle;
                conn.pending_multi_result = None;
            }

            Ok(MySqlResultStep::Affected {
                affected_rows: ok.affected_rows,
                out_params: ok.status.contains(Status::SERVER_PS_OUT_PARAMS),
            })
        }
        ResponseHead::ResultSetColumns(columns, types) => {
            let next_format = if is_binary {
                RowFormat::Binary { column_types: types.into() }
            } else {
                RowFormat::Text
            };

            Ok(MySqlResultStep::Rows(MySqlResultSet::new(
                conn,
                columns.into(),
                next_format,
                "<multi-result>",
            )))
        }
    }
}

/// `COM_STMT_CLOSE`: the server sends no response.
pub(crate) async fn close_statement(conn: &mut MySqlConnection, statement_id: u32) -> Result<()> {
    send(conn, &ComStmtClose { statement_id }).await
}

/// `COM_PING`.
pub(crate) async fn ping(conn: &mut MySqlConnection) -> Result<()> {
    send(conn, &ComPing).await?;

    match read_response_head(conn).await? {
        ResponseHead::Ok(_) => {
            conn.state = ConnectionState::Idle;
            Ok(())
        }
        ResponseHead::ResultSetColumns(columns, _types) => {
            drain(conn, columns, RowFormat::Text, "COM_PING").await?;
            Err(Error::protocol("COM_PING unexpectedly produced a result set"))
        }
    }
}

/// `COM_QUIT`: the server closes the socket without replying.
pub(crate) async fn quit(conn: &mut MySqlConnection) -> Result<()> {
    send(conn, &ComQuit).await
}

/// `COM_RESET_CONNECTION`.
pub(crate) async fn reset_connection(conn: &mut MySqlConnection) -> Result<()> {
    send(conn, &ComResetConnection).await?;

    match read_response_head(conn).await? {
        ResponseHead::Ok(_) => {
            conn.state = ConnectionState::Idle;
            Ok(())
        }
        ResponseHead::ResultSetColumns(columns, _types) => {
            drain(conn, columns, RowFormat::Text, "COM_RESET_CONNECTION").await?;
            Err(Error::protocol("COM_RESET_CONNECTION unexpectedly produced a result set"))
        }
    }
}
