//! `Pool` internals: `{config, idle_deque, waiters_queue, current_size,
//! draining_flag}`, plus the lease algorithm and background maintainer loop.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, Notify};

use crate::error::{Error, Result};
use crate::log::{LogEvent, SharedLogHandler};
use crate::mysql::{connect, MySqlConnectOptions};
use crate::pool::entry::{EntryIdGenerator, LeaseState, PooledEntry};
use crate::pool::metrics::PoolMetrics;
use crate::pool::options::{PoolConnectionMetadata, PoolOptions};

pub(crate) struct PoolInner {
    pub(crate) connect_options: MySqlConnectOptions,
    pub(crate) options: PoolOptions,
    pub(crate) log_handler: SharedLogHandler,

    idle: Mutex<VecDeque<PooledEntry>>,
    /// Woken every time an idle entry is pushed, or `current_size` shrinks (freeing room for
    /// a waiter stuck below `max_connections` to open a new connection). `notify_one` wakes
    /// waiters in the order they started waiting.
    notify: Notify,

    current_size: AtomicU32,
    waiters: AtomicU32,
    closed: AtomicBool,

    entry_ids: EntryIdGenerator,
}

impl PoolInner {
    pub(crate) fn new(connect_options: MySqlConnectOptions, options: PoolOptions, log_handler: SharedLogHandler) -> Arc<Self> {
        let inner = Arc::new(Self {
            connect_options,
            options,
            log_handler,
            idle: Mutex::new(VecDeque::new()),
            notify: Notify::new(),
            current_size: AtomicU32::new(0),
            waiters: AtomicU32::new(0),
            closed: AtomicBool::new(false),
            entry_ids: EntryIdGenerator::default(),
        });

        spawn_maintainer(Arc::clone(&inner));

        inner
    }

    pub(crate) fn size(&self) -> u32 {
        self.current_size.load(Ordering::Acquire)
    }

    pub(crate) async fn num_idle(&self) -> u32 {
        self.idle.lock().await.len() as u32
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub(crate) async fn metrics(&self) -> PoolMetrics {
        PoolMetrics::new(self.size(), self.num_idle().await, self.waiters.load(Ordering::Relaxed))
    }

    /// The lease algorithm:
    /// 1. Pop an idle entry if one exists; validate it, discarding on failure and retrying.
    /// 2. Else, if under `max_connections`, open a new physical connection.
    /// 3. Else, wait for a slot, bounded by `connection_timeout`.
    pub(crate) async fn acquire(self: &Arc<Self>) -> Result<PooledEntry> {
        if self.closed.load(Ordering::Acquire) {
            return Err(Error::PoolClosed);
        }

        let deadline = Instant::now() + self.options.connection_timeout;

        loop {
            if self.closed.load(Ordering::Acquire) {
                return Err(Error::PoolClosed);
            }

            if let Some(entry) = self.try_take_idle().await {
                match self.validate(entry).await {
                    Some(entry) => return Ok(entry),
                    None => continue,
                }
            }

            if self.try_reserve_slot() {
                match self.open_new(deadline).await {
                    Ok(mut entry) => {
                        entry.lease();
                        return Ok(entry);
                    }
                    Err(e) => {
                        self.current_size.fetch_sub(1, Ordering::AcqRel);
                        self.notify.notify_one();
                        return Err(e);
                    }
                }
            }

            let remaining = deadline.checked_duration_since(Instant::now()).ok_or(Error::PoolTimedOut)?;

            self.waiters.fetch_add(1, Ordering::Relaxed);
            let waited = tokio::time::timeout(remaining, self.notify.notified()).await;
            self.waiters.fetch_sub(1, Ordering::Relaxed);

            if waited.is_err() {
                return Err(Error::PoolTimedOut);
            }
            // Woken up: either an idle entry appeared or a slot freed up. Loop and try again.
        }
    }

    async fn try_take_idle(&self) -> Option<PooledEntry> {
        self.idle.lock().await.pop_back()
    }

    /// `true` if this call reserved the right to grow `current_size` by one; the caller must
    /// either succeed in opening a connection or give the slot back.
    fn try_reserve_slot(&self) -> bool {
        let max = self.options.max_connections;
        self.current_size
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |size| {
                (size < max).then_some(size + 1)
            })
            .is_ok()
    }

    async fn open_new(&self, deadline: Instant) -> Result<PooledEntry> {
        let remaining = deadline.checked_duration_since(Instant::now()).ok_or(Error::PoolTimedOut)?;

        let session = tokio::time::timeout(remaining, connect(&self.connect_options))
            .await
            .map_err(|_| Error::PoolTimedOut)??;

        let mut entry = PooledEntry::new(self.entry_ids.next(), session);

        if let Some(sql) = &self.options.connection_init_sql {
            entry.session.execute(sql).await?;
        }

        if let Some(after_connect) = &self.options.after_connect {
            after_connect(&mut entry.session, PoolConnectionMetadata {
                age: Duration::ZERO,
                idle_for: Duration::ZERO,
            })
            .await?;
        }

        Ok(entry)
    }

    /// Validates a just-popped idle entry (age, idle-for, optional `before_acquire`/ping),
    /// discarding it and freeing its slot on any failure. Returns `None` when discarded so
    /// the caller's loop retries.
    async fn validate(&self, mut entry: PooledEntry) -> Option<PooledEntry> {
        let idle_for = entry.last_used_at.elapsed();

        if self.should_reap(&entry) {
            self.discard(entry).await;
            return None;
        }

        if self.options.test_before_acquire {
            let timeout = self.options.validation_timeout;
            let test_result = match &self.options.connection_test_query {
                Some(sql) => {
                    tokio::time::timeout(timeout, entry.session.execute(sql))
                        .await
                        .map(|r| r.map(|_| ()))
                }
                None => tokio::time::timeout(timeout, entry.session.ping()).await,
            };

            if !matches!(test_result, Ok(Ok(()))) {
                self.discard(entry).await;
                return None;
            }
        }

        if let Some(before_acquire) = &self.options.before_acquire {
            let meta = PoolConnectionMetadata {
                age: entry.created_at.elapsed(),
                idle_for,
            };
            match before_acquire(&mut entry.session, meta).await {
                Ok(true) => {}
                _ => {
                    self.discard(entry).await;
                    return None;
                }
            }
        }

        entry.lease();
        Some(entry)
    }

    fn should_reap(&self, entry: &PooledEntry) -> bool {
        let too_old = self
            .options
            .max_lifetime
            .is_some_and(|max| entry.created_at.elapsed() >= max);
        let too_idle = self
            .options
            .idle_timeout
            .is_some_and(|max| entry.last_used_at.elapsed() >= max);
        too_old || too_idle
    }

    /// Closes a discarded entry and frees its slot, waking one waiter that might now be able
    /// to open a fresh connection under `max_connections`.
    async fn discard(&self, mut entry: PooledEntry) {
        entry.state = LeaseState::Closing;
        let _ = entry.session.close().await;
        self.current_size.fetch_sub(1, Ordering::AcqRel);
        self.notify.notify_one();
    }

    /// `release`: runs session reset + `after_release`, then either
    /// re-idles the entry or closes it. Always called with the entry's generation still
    /// matching what was leased -- ownership guarantees this, but the check is an arena-style
    /// generation guard against a detached-release race (see `pool::connection`).
    pub(crate) async fn release(self: &Arc<Self>, mut entry: PooledEntry, generation: u64) {
        if !entry.validate_release(generation) {
            log::error!("pool: release with stale generation for entry {:?}; discarding", entry.id);
            self.discard(entry).await;
            return;
        }

        if self.closed.load(Ordering::Acquire) {
            self.discard(entry).await;
            return;
        }

        let reset_ok = entry.session.reset_session().await.is_ok();

        let after_release_ok = match &self.options.after_release {
            Some(after_release) => {
                let meta = PoolConnectionMetadata {
                    age: entry.created_at.elapsed(),
                    idle_for: Duration::ZERO,
                };
                matches!(after_release(&mut entry.session, meta).await, Ok(true))
            }
            None => true,
        };

        if !reset_ok || !after_release_ok || !entry.session.is_fresh_baseline() {
            self.discard(entry).await;
            return;
        }

        entry.state = LeaseState::Idle;
        entry.last_used_at = Instant::now();
        self.idle.lock().await.push_back(entry);
        self.notify.notify_one();
    }

    /// `close()`: stops accepting new leases, drains idle connections,
    /// and waits for outstanding leases to be returned (and discarded, since `closed` is now
    /// set) before resolving.
    pub(crate) async fn close(self: &Arc<Self>) {
        self.closed.store(true, Ordering::Release);
        self.notify.notify_waiters();

        loop {
            let idle: Vec<_> = self.idle.lock().await.drain(..).collect();
            for entry in idle {
                self.discard(entry).await;
            }

            if self.current_size.load(Ordering::Acquire) == 0 {
                return;
            }

            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    pub(crate) fn log(&self, event: LogEvent<'_>) {
        self.log_handler.run(event);
    }

    /// Used when a leased connection is closed directly
    /// instead of released back through the normal reset path: the entry never re-enters the
    /// idle queue, so only the size accounting and waiter wake-up are needed.
    pub(crate) fn forget_leased_slot(&self) {
        self.current_size.fetch_sub(1, Ordering::AcqRel);
        self.notify.notify_one();
    }
}

/// Background task: tops up `min_connections`, reaps idle
/// entries past `idle_timeout`/`max_lifetime`, and pings idle entries on `keepalive_interval`.
/// Maintains both a ceiling (`max_connections`, enforced at acquire time) and a floor.
fn spawn_maintainer(pool: Arc<PoolInner>) {
    let tick = [
        pool.options.idle_timeout,
        pool.options.max_lifetime,
        pool.options.keepalive_interval,
    ]
    .into_iter()
    .flatten()
    .min();

    let Some(tick) = tick else { return };
    let tick = tick.max(Duration::from_secs(1));

    tokio::spawn(async move {
        while !pool.closed.load(Ordering::Acquire) {
            tokio::time::sleep(tick).await;

            if pool.closed.load(Ordering::Acquire) {
                break;
            }

            reap_and_top_up(&pool).await;
        }
    });
}

async fn reap_and_top_up(pool: &Arc<PoolInner>) {
    let stale: Vec<PooledEntry> = {
        let mut idle = pool.idle.lock().await;
        let mut keep = VecDeque::with_capacity(idle.len());
        let mut stale = Vec::new();

        while let Some(entry) = idle.pop_front() {
            if pool.should_reap(&entry) {
                stale.push(entry);
            } else {
                keep.push_back(entry);
            }
        }

        *idle = keep;
        stale
    };

    for entry in stale {
        pool.discard(entry).await;
    }

    if let Some(keepalive) = pool.options.keepalive_interval {
        let due: Vec<PooledEntry> = {
            let mut idle = pool.idle.lock().await;
            let mut keep = VecDeque::with_capacity(idle.len());
            let mut due = Vec::new();

            while let Some(entry) = idle.pop_front() {
                if entry.last_used_at.elapsed() >= keepalive {
                    due.push(entry);
                } else {
                    keep.push_back(entry);
                }
            }

            *idle = keep;
            due
        };

        for mut entry in due {
            let _ = entry.session.ping().await;
            entry.last_used_at = Instant::now();
            pool.idle.lock().await.push_back(entry);
        }
    }

    let min = pool.options.min_connections;
    while pool.current_size.load(Ordering::Acquire) < min && pool.try_reserve_slot() {
        let deadline = Instant::now() + pool.options.connection_timeout;
        match pool.open_new(deadline).await {
            Ok(mut entry) => {
                entry.state = LeaseState::Idle;
                pool.idle.lock().await.push_back(entry);
                pool.notify.notify_one();
            }
            Err(e) => {
                pool.current_size.fetch_sub(1, Ordering::AcqRel);
                log::warn!("pool: failed to maintain min_connections: {e}");
                break;
            }
        }
    }
}
