//! The [`LogEvent`] / [`LogHandler`] seam consumed by external collaborators (query builders,
//! ORM layers) that want to observe every statement this connection runs without the core
//! depending on any particular logging framework.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::error::Error;

/// One statement's outcome, handed to a [`LogHandler`].
///
/// This is a tagged union, not an open trait, per the "Dynamic dispatch" design note: the set
/// of things worth logging about a statement is closed and small.
#[derive(Debug)]
pub enum LogEvent<'a> {
    /// The statement ran to completion.
    Success {
        sql: &'a str,
        rows_affected: u64,
        elapsed: Duration,
    },

    /// The statement was sent but the server returned an `ERR` packet, or the network failed
    /// while it was in flight.
    ExecFailure {
        sql: &'a str,
        elapsed: Duration,
        cause: &'a Error,
    },

    /// The statement's result set started arriving but a row or column failed to decode.
    ProcessingFailure {
        sql: &'a str,
        elapsed: Duration,
        cause: &'a Error,
    },
}

impl fmt::Display for LogEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogEvent::Success {
                sql,
                rows_affected,
                elapsed,
            } => write!(
                f,
                "{sql:?}; rows_affected={rows_affected}, elapsed={elapsed:?}"
            ),
            LogEvent::ExecFailure { sql, elapsed, cause } => {
                write!(f, "{sql:?}; elapsed={elapsed:?}, error={cause}")
            }
            LogEvent::ProcessingFailure { sql, elapsed, cause } => {
                write!(f, "{sql:?}; elapsed={elapsed:?}, error={cause} (while decoding rows)")
            }
        }
    }
}

/// A sink for [`LogEvent`]s. Implementations are free to forward to `log`, `tracing`,
/// a metrics exporter, or nowhere at all.
pub trait LogHandler: Send + Sync + 'static {
    fn run(&self, event: LogEvent<'_>);
}

/// The default handler: forwards to the `log` crate at a level appropriate to the event kind
/// (debug for success, warn for failures).
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultLogHandler;

impl LogHandler for DefaultLogHandler {
    fn run(&self, event: LogEvent<'_>) {
        match &event {
            LogEvent::Success { .. } => log::debug!("{event}"),
            LogEvent::ExecFailure { .. } => log::warn!("{event}"),
            LogEvent::ProcessingFailure { .. } => log::error!("{event}"),
        }
    }
}

pub(crate) type SharedLogHandler = Arc<dyn LogHandler>;

pub(crate) fn default_handler() -> SharedLogHandler {
    Arc::new(DefaultLogHandler)
}
