//! Error and Result types.

use std::fmt::{self, Debug, Display};
use std::io;

pub use crate::mysql::error::MySqlDatabaseError;

/// A specialized `Result` type for ldbc.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A generic error that represents all the ways a method can fail.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Error communicating with the database over the transport.
    #[error("{0}")]
    Io(#[from] io::Error),

    /// An error occurred during a TLS upgrade.
    #[error("error during TLS upgrade: {0}")]
    Tls(Box<dyn std::error::Error + Send + Sync>),

    /// The connection URL was malformed.
    #[error("{0}")]
    UrlParse(#[from] url::ParseError),

    /// An invalid value was given to a configuration method; fails fast at construction.
    #[error("invalid configuration: {0}")]
    Configuration(Box<str>),

    /// Credentials were rejected, or TLS was required but not negotiated.
    #[error("authentication failed: {0}")]
    AuthenticationFailed(Box<str>),

    /// The server's bytes did not match the protocol grammar we expect.
    ///
    /// Fatal: the connection that produced this error must be discarded, never returned
    /// to a pool.
    #[error("protocol violation: {0}")]
    Protocol(Box<str>),

    /// An error returned by the server in response to a command (an `ERR` packet).
    ///
    /// Recoverable: the connection that produced this remains usable.
    #[error("{0}")]
    Database(Box<MySqlDatabaseError>),

    /// A command was issued on a connection that already has one in flight, or on a
    /// connection that has been closed.
    #[error("{0}")]
    ClientState(Box<str>),

    /// No rows were returned by a query that expected to return at least one row.
    #[error("found no rows when we expected at least one")]
    RowNotFound,

    /// Column was not found by name in a `Row`.
    #[error("no column found with the name {0:?}")]
    ColumnNotFound(Box<str>),

    /// Column index was out of bounds.
    #[error("column index out of bounds: there are {len} columns but the index is {index}")]
    ColumnIndexOutOfBounds { index: usize, len: usize },

    /// A value could not be decoded into the requested Rust type.
    #[error("error decoding column {index:?}: {source}")]
    ColumnDecode {
        index: Box<str>,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// [`Pool::acquire`](crate::pool::Pool::acquire) timed out waiting for a connection.
    #[error("timed out while waiting for an open connection")]
    PoolTimedOut,

    /// [`Pool::close`](crate::pool::Pool::close) was called while a caller was waiting in
    /// `acquire`, or a caller tried to acquire from an already-closed pool.
    #[error("attempted to acquire a connection on a closed pool")]
    PoolClosed,

    /// A named-only savepoint was asked for an id.
    #[error("only named savepoints are supported")]
    UnnamedSavepoint,
}

impl Error {
    pub(crate) fn protocol(message: impl Into<String>) -> Self {
        Error::Protocol(message.into().into_boxed_str())
    }

    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration(message.into().into_boxed_str())
    }

    pub(crate) fn client_state(message: impl Into<String>) -> Self {
        Error::ClientState(message.into().into_boxed_str())
    }

    pub(crate) fn tls(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Error::Tls(Box::new(error))
    }

    /// Returns the SQLSTATE of the underlying database error, if this is [`Error::Database`].
    pub fn sqlstate(&self) -> Option<&str> {
        match self {
            Error::Database(db) => Some(db.sqlstate()),
            _ => None,
        }
    }

    /// `true` if this error represents a transient network condition that is worth retrying
    /// at the pool-acquisition layer only.
    pub fn is_transient_network(&self) -> bool {
        matches!(
            self,
            Error::Io(e) if matches!(
                e.kind(),
                io::ErrorKind::ConnectionRefused
                    | io::ErrorKind::TimedOut
                    | io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
            )
        )
    }
}

macro_rules! protocol_err {
    ($($args:tt)*) => {
        $crate::error::Error::protocol(format!($($args)*))
    };
}

pub(crate) use protocol_err;
