//! The session/connection state machine.

mod establish;
pub(crate) mod executor;
mod result;

pub use establish::connect;
pub use result::{MySqlResultSet, MySqlResultStep};

use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::log::{LogHandler, SharedLogHandler};
use crate::mysql::options::IsolationLevel;
use crate::mysql::protocol::{AuthPlugin, Capabilities};
use crate::mysql::stream::PacketStream;
use result::RowFormat;

/// `ConnectionState`: at most one command may be in flight; issuing a new one
/// while a result set is open is rejected synchronously.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConnectionState {
    Idle,
    InQuery,
    InPrepare,
    InExecute,
    Closed,
}

/// Transaction/session-variable state tracked client-side so the pool can cheaply decide
/// whether a returned connection is a "fresh baseline".
#[derive(Debug, Clone)]
pub(crate) struct SessionState {
    pub(crate) autocommit: bool,
    pub(crate) in_transaction: bool,
    pub(crate) read_only: bool,
    pub(crate) isolation_level: Option<IsolationLevel>,
    pub(crate) savepoint_counter: u64,
    pub(crate) local_infile_enabled: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            autocommit: true,
            in_transaction: false,
            read_only: false,
            isolation_level: None,
            savepoint_counter: 0,
            local_infile_enabled: false,
        }
    }
}

impl SessionState {
    /// A session returned to the pool must have `autocommit = default` and no open
    /// transaction.
    pub(crate) fn is_fresh_baseline(&self) -> bool {
        self.autocommit && !self.in_transaction
    }
}

/// A live MySQL/MariaDB session.
///
/// Owns: the transport, negotiated capabilities, session variables, the in-flight command
/// slot (`state`), and the sequence counter (inside [`PacketStream`]). Lifetime runs from
/// physical connect to `COM_QUIT` or a fatal error.
pub struct MySqlConnection {
    pub(crate) stream: PacketStream,
    pub(crate) capabilities: Capabilities,
    pub(crate) state: ConnectionState,
    pub(crate) server_version: Box<str>,
    pub(crate) connection_id: u32,
    pub(crate) collation: u8,
    pub(crate) session: SessionState,
    pub(crate) log_handler: SharedLogHandler,
    /// Set at connect time; re-sent verbatim on `COM_CHANGE_USER`.
    pub(crate) username: Box<str>,
    pub(crate) database: Option<Box<str>>,
    /// The plugin/scramble negotiated during the initial handshake, replayed by
    /// `COM_CHANGE_USER` which has no handshake phase of its own.
    pub(crate) auth_plugin: AuthPlugin,
    pub(crate) auth_scramble: Box<[u8]>,
    /// `Some` while a multi-result-set chain has more steps left on the wire; cleared once
    /// the terminating step (no `SERVER_MORE_RESULTS_EXISTS`) is read.
    pub(crate) pending_multi_result: Option<RowFormat>,
}

impl MySqlConnection {
    pub fn server_version(&self) -> &str {
        &self.server_version
    }

    pub fn connection_id(&self) -> u32 {
        self.connection_id
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn get_auto_commit(&self) -> bool {
        self.session.autocommit
    }

    pub fn is_read_only(&self) -> bool {
        self.session.read_only
    }

    pub fn in_transaction(&self) -> bool {
        self.session.in_transaction
    }

    pub(crate) fn is_fresh_baseline(&self) -> bool {
        self.session.is_fresh_baseline() && self.state == ConnectionState::Idle
    }

    pub fn set_log_handler(&mut self, handler: impl LogHandler) {
        self.log_handler = std::sync::Arc::new(handler);
    }

    fn ensure_idle(&self) -> Result<()> {
        match self.state {
            ConnectionState::Idle => Ok(()),
            ConnectionState::Closed => {
                Err(Error::client_state("connection is closed"))
            }
            _ => Err(Error::client_state(
                "a command is already in flight on this session; consume or close the open result set first",
            )),
        }
    }

    /// `set_auto_commit(bool)`: issues `SET autocommit=…`.
    pub async fn set_auto_commit(&mut self, value: bool) -> Result<()> {
        self.execute(&format!("SET autocommit={}", value as u8)).await?;
        self.session.autocommit = value;
        Ok(())
    }

    /// `set_transaction_isolation(level)`.
    pub async fn set_transaction_isolation(&mut self, level: IsolationLevel) -> Result<()> {
        self.execute(&format!("SET TRANSACTION ISOLATION LEVEL {}", level.as_sql()))
            .await?;
        self.session.isolation_level = Some(level);
        Ok(())
    }

    /// `set_read_only(bool)`.
    pub async fn set_read_only(&mut self, value: bool) -> Result<()> {
        self.execute(&format!(
            "SET TRANSACTION READ {}",
            if value { "ONLY" } else { "WRITE" }
        ))
        .await?;
        self.session.read_only = value;
        Ok(())
    }

    /// `begin()`.
    pub async fn begin(&mut self) -> Result<()> {
        self.execute("START TRANSACTION").await?;
        self.session.in_transaction = true;
        Ok(())
    }

    /// `commit()`.
    pub async fn commit(&mut self) -> Result<()> {
        self.execute("COMMIT").await?;
        self.session.in_transaction = false;
        Ok(())
    }

    /// `rollback()`. Idempotent on an already-rolled-back transaction: MySQL's own `ROLLBACK`
    /// is a no-op outside a transaction, so no client-side guard is needed beyond clearing the
    /// local flag.
    pub async fn rollback(&mut self) -> Result<()> {
        self.execute("ROLLBACK").await?;
        self.session.in_transaction = false;
        Ok(())
    }

    /// `is_valid(timeout)`: `COM_PING` under a deadline.
    pub async fn is_valid(&mut self, timeout: Duration) -> Result<bool> {
        match tokio::time::timeout(timeout, self.ping()).await {
            Ok(Ok(())) => Ok(true),
            Ok(Err(_)) => Ok(false),
            Err(_) => Ok(false),
        }
    }

    /// `COM_PING`: round-trips without touching session state.
    pub async fn ping(&mut self) -> Result<()> {
        self.ensure_idle()?;

        let started = Instant::now();
        let result = executor::ping(self).await;

        match &result {
            Ok(()) => self.log(crate::log::LogEvent::Success {
                sql: "COM_PING",
                rows_affected: 0,
                elapsed: started.elapsed(),
            }),
            Err(e) => self.log(crate::log::LogEvent::ExecFailure {
                sql: "COM_PING",
                elapsed: started.elapsed(),
                cause: e,
            }),
        }

        result
    }

    /// `change_user(user, password, database?)`: re-runs the auth sub-protocol
    /// on the open socket and resets session state without reconnecting.
    pub async fn change_user(
        &mut self,
        username: &str,
        password: &str,
        database: Option<&str>,
    ) -> Result<()> {
        self.ensure_idle()?;
        establish::change_user(self, username, password, database).await?;
        self.session = SessionState::default();
        self.username = username.into();
        self.database = database.map(Into::into);
        Ok(())
    }

    /// `close()`: sends `COM_QUIT`, closes the transport.
    pub async fn close(mut self) -> Result<()> {
        if self.state == ConnectionState::Closed {
            return Ok(());
        }

        let _ = executor::quit(&mut self).await;
        self.state = ConnectionState::Closed;
        Ok(())
    }

    /// `RESET CONNECTION`, preferred over a closed-open
    /// reconnect when returning a session to the idle pool. Falls back to the explicit SQL
    /// reset sequence when the negotiated server doesn't support the command (pre-5.7.3 /
    /// pre-10.2.4 MariaDB).
    pub(crate) async fn reset_session(&mut self) -> Result<()> {
        self.ensure_idle()?;

        if self.session.in_transaction {
            self.rollback().await?;
        }

        match executor::reset_connection(self).await {
            Ok(()) => {
                self.session = SessionState::default();
                Ok(())
            }
            Err(_) => {
                // Fallback sequence: explicit SQL undoes what `RESET CONNECTION` would have,
                // short of clearing prepared-statement handles server-side (those are
                // individually closed by the pool's cache eviction instead).
                if !self.session.autocommit {
                    self.set_auto_commit(true).await?;
                }
                self.session = SessionState::default();
                Ok(())
            }
        }
    }

    pub(crate) fn log(&self, event: crate::log::LogEvent<'_>) {
        self.log_handler.run(event);
    }

    /// `create_statement()` / `Statement::execute*`: issues the SQL through
    /// the text protocol (`COM_QUERY`).
    pub async fn query(&mut self, sql: &str) -> Result<MySqlResultSet<'_>> {
        self.ensure_idle()?;
        executor::query(self, sql).await
    }

    /// `Statement::execute_update(sql) → u64`.
    pub async fn execute(&mut self, sql: &str) -> Result<u64> {
        self.ensure_idle()?;
        executor::execute(self, sql).await
    }

    /// `Statement::execute(sql) → bool`: `true` if the statement produced a result set.
    pub async fn execute_returning_bool(&mut self, sql: &str) -> Result<bool> {
        self.ensure_idle()?;
        executor::execute_returning_bool(self, sql).await
    }

    /// `prepare_statement(sql) → PreparedStatement`.
    pub async fn prepare<'c>(&'c mut self, sql: &str) -> Result<crate::mysql::statement::MySqlStatement<'c>> {
        self.ensure_idle()?;
        executor::prepare(self, sql).await
    }

    /// `true` while a just-finished result set's terminating status carried
    /// `SERVER_MORE_RESULTS_EXISTS`, meaning [`Self::next_result`] has another step to read.
    pub fn has_more_results(&self) -> bool {
        self.pending_multi_result.is_some()
    }

    /// Advances a multi-result-set chain (a stored-procedure call, or several `;`-separated
    /// statements under `CLIENT_MULTI_STATEMENTS`) to its next step: either another row-producing
    /// result set or a plain affected-rows outcome. Returns `Ok(None)` once the chain is
    /// exhausted (equivalent to `has_more_results()` being `false`).
    pub async fn next_result(&mut self) -> Result<Option<MySqlResultStep<'_>>> {
        let Some(format) = self.pending_multi_result.clone() else {
            return Ok(None);
        };

        executor::next_result_set(self, format).await.map(Some)
    }
}
