//! The connection pool.
//!
//! [`MySqlPool`] is the `DataSource`: `get_connection()`
//! leases a [`PooledConnection`] that returns itself to the pool when dropped. Internals live
//! in [`inner`] behind an `Arc` so cloning a `MySqlPool` is cheap and every clone shares the
//! same idle queue, size counter, and maintainer task.

mod connection;
mod entry;
mod inner;
mod metrics;
mod options;

pub use connection::PooledConnection;
pub use metrics::PoolMetrics;
pub use options::{PoolConnectionMetadata, PoolOptions};

use std::sync::Arc;

use crate::error::Result;
use crate::log::default_handler;
use crate::mysql::MySqlConnectOptions;
use crate::pool::inner::PoolInner;

/// A pool of [`crate::mysql::MySqlConnection`]s.
///
/// Cloning a `MySqlPool` is cheap (an `Arc` clone) and all clones share one pool of physical
/// connections, so many callers can acquire leases concurrently from the same pool.
#[derive(Clone)]
pub struct MySqlPool {
    inner: Arc<PoolInner>,
}

impl MySqlPool {
    /// Connects using default [`PoolOptions`].
    pub async fn connect(url: &str) -> Result<Self> {
        PoolOptions::new().connect(url).await
    }

    /// Connects using already-parsed [`MySqlConnectOptions`] and default [`PoolOptions`].
    pub async fn connect_with(connect_options: MySqlConnectOptions) -> Result<Self> {
        PoolOptions::new().connect_with(connect_options).await
    }

    pub(crate) fn from_parts(connect_options: MySqlConnectOptions, options: PoolOptions) -> Self {
        Self {
            inner: PoolInner::new(connect_options, options, default_handler()),
        }
    }

    /// `get_connection() → scoped Connection`. Waits for at most
    /// `connection_timeout` before failing with [`crate::error::Error::PoolTimedOut`].
    pub async fn get_connection(&self) -> Result<PooledConnection> {
        let entry = self.inner.acquire().await?;
        Ok(PooledConnection::new(entry, Arc::clone(&self.inner)))
    }

    /// Alias for [`Self::get_connection`], matching the common `acquire()` naming most Rust
    /// database pools use.
    pub async fn acquire(&self) -> Result<PooledConnection> {
        self.get_connection().await
    }

    /// `current_size`.
    pub fn size(&self) -> u32 {
        self.inner.size()
    }

    /// Number of connections currently idle in the pool.
    pub async fn num_idle(&self) -> u32 {
        self.inner.num_idle().await
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }

    /// A snapshot of pool occupancy.
    pub async fn metrics(&self) -> PoolMetrics {
        self.inner.metrics().await
    }

    /// Stops accepting new leases, closes every idle connection, and waits for outstanding
    /// leases to drain.
    pub async fn close(&self) {
        self.inner.close().await;
    }
}

impl std::fmt::Debug for MySqlPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlPool")
            .field("size", &self.inner.size())
            .field("is_closed", &self.inner.is_closed())
            .finish_non_exhaustive()
    }
}

impl PoolOptions {
    /// Parses `url` and opens a pool.
    pub async fn connect(self, url: &str) -> Result<MySqlPool> {
        self.connect_with(MySqlConnectOptions::parse(url)?).await
    }

    /// Opens a pool from already-constructed [`MySqlConnectOptions`].
    pub async fn connect_with(self, connect_options: MySqlConnectOptions) -> Result<MySqlPool> {
        let pool = MySqlPool::from_parts(connect_options, self.clone());

        // Eagerly bring the pool up to `min_connections`, bounded by `connection_timeout`,
        // the same best-effort semantics as the background maintainer.
        if self.min_connections > 0 {
            let mut handles = Vec::with_capacity(self.min_connections as usize);
            for _ in 0..self.min_connections {
                match pool.get_connection().await {
                    Ok(conn) => handles.push(conn),
                    Err(_) => break,
                }
            }
            // Dropping these returns them to idle immediately rather than leasing them out.
            drop(handles);
        }

        Ok(pool)
    }
}
