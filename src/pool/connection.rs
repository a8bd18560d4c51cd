//! `PooledConnection` -- the scoped, exclusive lease handle returned by
//! `DataSource::get_connection()`. Dropping it returns the session to the pool; this can't run
//! the async reset sequence inline from `Drop`, so it hands the entry to a detached task that
//! runs `RESET CONNECTION` before the entry rejoins the idle queue.

use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::mysql::MySqlConnection;
use crate::pool::entry::PooledEntry;
use crate::pool::inner::PoolInner;

/// A leased [`MySqlConnection`]. Exclusive for the
/// lifetime of the handle; release happens on drop or via [`PooledConnection::release`].
pub struct PooledConnection {
    entry: Option<PooledEntry>,
    generation: u64,
    pool: Arc<PoolInner>,
    acquired_at: Instant,
    leak_guard: Option<Arc<AtomicBool>>,
}

impl PooledConnection {
    pub(crate) fn new(entry: PooledEntry, pool: Arc<PoolInner>) -> Self {
        let generation = entry.generation;
        let leak_guard = pool.options.leak_detection_threshold.map(|threshold| {
            spawn_leak_watcher(entry.id, threshold)
        });

        Self {
            entry: Some(entry),
            generation,
            pool,
            acquired_at: Instant::now(),
            leak_guard,
        }
    }

    /// How long this lease has been held.
    pub fn leased_for(&self) -> Duration {
        self.acquired_at.elapsed()
    }

    /// Explicitly returns the connection to the pool. Equivalent to dropping the handle,
    /// except the reset sequence runs on the caller's task instead of a detached one, so
    /// errors and completion are observable.
    pub async fn release(mut self) {
        if let Some(guard) = self.leak_guard.take() {
            guard.store(true, Ordering::Release);
        }
        if let Some(entry) = self.entry.take() {
            self.pool.release(entry, self.generation).await;
        }
    }

    /// Closes the physical connection instead of returning it to the pool, e.g. after the
    /// caller observes a fatal protocol error on it.
    pub async fn close(mut self) {
        if let Some(guard) = self.leak_guard.take() {
            guard.store(true, Ordering::Release);
        }
        if let Some(mut entry) = self.entry.take() {
            let _ = entry.session.close().await;
            self.pool.forget_leased_slot();
        }
    }
}

impl Deref for PooledConnection {
    type Target = MySqlConnection;

    fn deref(&self) -> &Self::Target {
        &self.entry.as_ref().expect("connection already released").session
    }
}

impl DerefMut for PooledConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.entry.as_mut().expect("connection already released").session
    }
}

impl Drop for PooledConnection {
    fn drop(&mut self) {
        if let Some(guard) = self.leak_guard.take() {
            guard.store(true, Ordering::Release);
        }

        if let Some(entry) = self.entry.take() {
            let pool = Arc::clone(&self.pool);
            let generation = self.generation;
            tokio::spawn(async move {
                pool.release(entry, generation).await;
            });
        }
    }
}

fn spawn_leak_watcher(entry_id: impl std::fmt::Debug + Send + 'static, threshold: Duration) -> Arc<AtomicBool> {
    let released = Arc::new(AtomicBool::new(false));
    let watcher_flag = Arc::clone(&released);

    tokio::spawn(async move {
        tokio::time::sleep(threshold).await;
        if !watcher_flag.load(Ordering::Acquire) {
            log::warn!(
                "pool: connection {entry_id:?} has been leased for longer than leak_detection_threshold ({threshold:?})"
            );
        }
    });

    released
}
