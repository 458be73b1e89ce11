//! Pool statistics types

use serde::{Deserialize, Serialize};

use super::state::RunState;

/// Snapshot of a connection pool's current state
///
/// Provides insight into pool utilization and lifetime activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    /// Lifecycle state at the time of the snapshot
    run_state: RunState,
    /// Total number of connections owned by the pool (idle + in-use)
    pool_size: usize,
    /// Number of idle connections available for checkout
    idle: usize,
    /// Number of connections currently checked out
    in_use: usize,
    /// Connections created over the pool's lifetime
    total_created: u64,
    /// Successful acquires over the pool's lifetime
    total_acquired: u64,
}

impl PoolStats {
    /// Create new pool statistics
    pub fn new(
        run_state: RunState,
        pool_size: usize,
        idle: usize,
        in_use: usize,
        total_created: u64,
        total_acquired: u64,
    ) -> Self {
        Self {
            run_state,
            pool_size,
            idle,
            in_use,
            total_created,
            total_acquired,
        }
    }

    /// Get the run state at snapshot time
    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    /// Get the total number of connections
    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// Get the number of idle connections
    pub fn idle(&self) -> usize {
        self.idle
    }

    /// Get the number of checked-out connections
    pub fn in_use(&self) -> usize {
        self.in_use
    }

    /// Get the number of connections created over the pool's lifetime
    pub fn total_created(&self) -> u64 {
        self.total_created
    }

    /// Get the number of successful acquires over the pool's lifetime
    pub fn total_acquired(&self) -> u64 {
        self.total_acquired
    }

    /// Calculate pool utilization as a fraction (0.0 to 1.0)
    ///
    /// Returns 0.0 if the pool holds no connections.
    pub fn utilization(&self) -> f64 {
        if self.pool_size == 0 {
            0.0
        } else {
            self.in_use as f64 / self.pool_size as f64
        }
    }

    /// Check if every connection the pool holds is in use
    pub fn is_full(&self) -> bool {
        self.idle == 0 && self.pool_size > 0
    }
}
