//! `PoolMetrics`: a read-only snapshot of the pool's shared counters. Exposed because leak
//! detection and health checks are only actionable operationally if their counters can be
//! observed from outside the pool.

/// A point-in-time snapshot of [`crate::pool::MySqlPool`] occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolMetrics {
    pub size: u32,
    pub idle: u32,
    pub leased: u32,
    pub waiters: u32,
}

impl PoolMetrics {
    pub(crate) fn new(size: u32, idle: u32, waiters: u32) -> Self {
        Self {
            size,
            idle,
            leased: size.saturating_sub(idle),
            waiters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leased_is_derived_from_size_minus_idle() {
        let metrics = PoolMetrics::new(5, 2, 0);
        assert_eq!(metrics.leased, 3);
    }
}
