//! `PoolOptions`: every knob governing pool capacity and lifecycle, plus the
//! `after_connect`/`before_acquire`/`after_release` extension points callers can hook into.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures_core::future::BoxFuture;

use crate::error::Result;
use crate::mysql::MySqlConnection;

/// Metadata handed to a `PoolOptions` callback alongside the connection it concerns.
#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
pub struct PoolConnectionMetadata {
    /// Time since the physical connection was established. `Duration::ZERO` for
    /// `after_connect`, which runs immediately after authentication.
    pub age: Duration,
    /// Time the connection spent in the idle queue before this acquisition.
    /// `Duration::ZERO` for `after_connect`/`after_release`.
    pub idle_for: Duration,
}

type AfterConnectFn =
    dyn Fn(&mut MySqlConnection, PoolConnectionMetadata) -> BoxFuture<'_, Result<()>> + Send + Sync;
type BeforeAcquireFn =
    dyn Fn(&mut MySqlConnection, PoolConnectionMetadata) -> BoxFuture<'_, Result<bool>> + Send + Sync;
type AfterReleaseFn =
    dyn Fn(&mut MySqlConnection, PoolConnectionMetadata) -> BoxFuture<'_, Result<bool>> + Send + Sync;

/// Configuration for a [`crate::pool::MySqlPool`].
#[derive(Clone)]
pub struct PoolOptions {
    pub(crate) min_connections: u32,
    pub(crate) max_connections: u32,
    pub(crate) connection_timeout: Duration,
    pub(crate) idle_timeout: Option<Duration>,
    pub(crate) max_lifetime: Option<Duration>,
    pub(crate) leak_detection_threshold: Option<Duration>,
    pub(crate) validation_timeout: Duration,
    pub(crate) connection_init_sql: Option<Arc<str>>,
    pub(crate) connection_test_query: Option<Arc<str>>,
    pub(crate) keepalive_interval: Option<Duration>,
    pub(crate) test_before_acquire: bool,

    pub(crate) after_connect: Option<Arc<AfterConnectFn>>,
    pub(crate) before_acquire: Option<Arc<BeforeAcquireFn>>,
    pub(crate) after_release: Option<Arc<AfterReleaseFn>>,
}

impl fmt::Debug for PoolOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolOptions")
            .field("min_connections", &self.min_connections)
            .field("max_connections", &self.max_connections)
            .field("connection_timeout", &self.connection_timeout)
            .field("idle_timeout", &self.idle_timeout)
            .field("max_lifetime", &self.max_lifetime)
            .field("leak_detection_threshold", &self.leak_detection_threshold)
            .field("validation_timeout", &self.validation_timeout)
            .field("connection_init_sql", &self.connection_init_sql)
            .field("connection_test_query", &self.connection_test_query)
            .field("keepalive_interval", &self.keepalive_interval)
            .field("test_before_acquire", &self.test_before_acquire)
            .finish_non_exhaustive()
    }
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            min_connections: 0,
            max_connections: 10,
            connection_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(10 * 60)),
            max_lifetime: Some(Duration::from_secs(30 * 60)),
            leak_detection_threshold: None,
            validation_timeout: Duration::from_secs(5),
            connection_init_sql: None,
            connection_test_query: None,
            keepalive_interval: None,
            test_before_acquire: true,
            after_connect: None,
            before_acquire: None,
            after_release: None,
        }
    }
}

impl PoolOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// `min_connections`: lower bound maintained by the maintainer loop.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// `max_connections`: hard upper bound on physical connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// `connection_timeout`: how long a caller waits for a lease before failing.
    pub fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// `idle_timeout`: idle entry evicted after this long.
    pub fn idle_timeout(mut self, timeout: impl Into<Option<Duration>>) -> Self {
        self.idle_timeout = timeout.into();
        self
    }

    /// `max_lifetime`: physical connection replaced after this age regardless of
    /// idle state.
    pub fn max_lifetime(mut self, lifetime: impl Into<Option<Duration>>) -> Self {
        self.max_lifetime = lifetime.into();
        self
    }

    /// `leak_detection_threshold`: non-zero -> log a warning if a lease is held
    /// longer than this.
    pub fn leak_detection_threshold(mut self, threshold: impl Into<Option<Duration>>) -> Self {
        self.leak_detection_threshold = threshold.into();
        self
    }

    /// `validation_timeout`: upper bound for `is_valid` during acquisition.
    pub fn validation_timeout(mut self, timeout: Duration) -> Self {
        self.validation_timeout = timeout;
        self
    }

    /// `connection_init_sql`: executed once after authentication.
    pub fn connection_init_sql(mut self, sql: impl Into<Arc<str>>) -> Self {
        self.connection_init_sql = Some(sql.into());
        self
    }

    /// `connection_test_query`: preferred over `COM_PING` when set.
    pub fn connection_test_query(mut self, sql: impl Into<Arc<str>>) -> Self {
        self.connection_test_query = Some(sql.into());
        self
    }

    /// `keep-alive interval`: periodic ping on idle connections.
    pub fn keepalive_interval(mut self, interval: impl Into<Option<Duration>>) -> Self {
        self.keepalive_interval = interval.into();
        self
    }

    /// Whether an idle connection is validated (ping or `connection_test_query`) before being
    /// handed back from `acquire()`. Defaults to `true`.
    pub fn test_before_acquire(mut self, test: bool) -> Self {
        self.test_before_acquire = test;
        self
    }

    /// Runs once per physical connection, immediately after authentication and
    /// `connection_init_sql`, before the connection is first handed out or placed idle.
    pub fn after_connect<F>(mut self, callback: F) -> Self
    where
        for<'c> F: Fn(&'c mut MySqlConnection, PoolConnectionMetadata) -> BoxFuture<'c, Result<()>>
            + Send
            + Sync
            + 'static,
    {
        self.after_connect = Some(Arc::new(callback));
        self
    }

    /// Runs on a previously-idle connection before it is handed to the caller. Returning
    /// `Ok(false)` or `Err` discards the connection and tries the next idle entry (or opens a
    /// new one).
    pub fn before_acquire<F>(mut self, callback: F) -> Self
    where
        for<'c> F: Fn(&'c mut MySqlConnection, PoolConnectionMetadata) -> BoxFuture<'c, Result<bool>>
            + Send
            + Sync
            + 'static,
    {
        self.before_acquire = Some(Arc::new(callback));
        self
    }

    /// Runs when a connection is returned to the pool, after the built-in session reset
    ///. Returning `Ok(false)` or `Err` closes the
    /// connection instead of placing it idle.
    pub fn after_release<F>(mut self, callback: F) -> Self
    where
        for<'c> F: Fn(&'c mut MySqlConnection, PoolConnectionMetadata) -> BoxFuture<'c, Result<bool>>
            + Send
            + Sync
            + 'static,
    {
        self.after_release = Some(Arc::new(callback));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_defaults_to_sane_values() {
        let opts = PoolOptions::default();
        assert_eq!(opts.min_connections, 0);
        assert_eq!(opts.max_connections, 10);
        assert!(opts.test_before_acquire);
        assert!(opts.leak_detection_threshold.is_none());
    }

    #[test]
    fn builder_methods_compose() {
        let opts = PoolOptions::new()
            .min_connections(2)
            .max_connections(5)
            .connection_timeout(Duration::from_secs(1))
            .idle_timeout(None)
            .leak_detection_threshold(Duration::from_secs(60));

        assert_eq!(opts.min_connections, 2);
        assert_eq!(opts.max_connections, 5);
        assert_eq!(opts.connection_timeout, Duration::from_secs(1));
        assert!(opts.idle_timeout.is_none());
        assert_eq!(opts.leak_detection_threshold, Some(Duration::from_secs(60)));
    }
}
