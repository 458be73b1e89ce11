//! Pooled connection wrapper

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;
use quarry_core::{Connection, QuarryError, Request, Result};
use uuid::Uuid;

use super::pool::PoolInner;

/// A connection checked out from a pool
///
/// Wraps one underlying connection for exclusive use by the holder. Every
/// operation except `close` fails once the wrapper is closed; `close`
/// itself is idempotent and hands the underlying connection back to the
/// pool, which decides whether it is recycled or destroyed. Dropping an
/// unclosed wrapper returns the connection as well.
///
/// The closed flag is shared with the pool so an immediate shutdown can
/// invalidate wrappers that are still held by callers.
pub struct PooledConnection {
    id: Uuid,
    raw: Arc<dyn Connection>,
    closed: Arc<AtomicBool>,
    created_at: Instant,
    last_used_at: Mutex<Instant>,
    pool: Arc<PoolInner>,
}

impl PooledConnection {
    pub(super) fn new(
        id: Uuid,
        raw: Arc<dyn Connection>,
        closed: Arc<AtomicBool>,
        pool: Arc<PoolInner>,
    ) -> Self {
        let now = Instant::now();
        Self {
            id,
            raw,
            closed,
            created_at: now,
            last_used_at: Mutex::new(now),
            pool,
        }
    }

    /// Identifier of this checkout, unique per handout
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Whether this wrapper has been closed
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// When this wrapper was handed out
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// When this wrapper last executed a request
    pub fn last_used_at(&self) -> Instant {
        *self.last_used_at.lock()
    }

    /// Time since this wrapper was handed out
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Time since the last request went through this wrapper
    pub fn idle_time(&self) -> Duration {
        self.last_used_at.lock().elapsed()
    }

    fn guard_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(QuarryError::ConnectionClosed);
        }
        Ok(())
    }
}

#[async_trait]
impl Connection for PooledConnection {
    async fn execute(&self, request: Request) -> Result<()> {
        self.guard_open()?;
        *self.last_used_at.lock() = Instant::now();
        self.raw.execute(request).await
    }

    async fn ping(&self, timeout: Duration) -> Result<bool> {
        self.guard_open()?;
        self.raw.ping(timeout).await
    }

    /// Close this wrapper, returning the underlying connection to the pool
    ///
    /// The pool recycles or destroys the connection depending on its run
    /// state and bounds. Calling `close` again, including after the pool
    /// force-closed the wrapper, is a no-op.
    async fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        tracing::debug!(connection_id = %self.id, "pooled connection closed");
        self.pool.release(self.id).await;
        Ok(())
    }
}

impl Drop for PooledConnection {
    fn drop(&mut self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        tracing::debug!(
            connection_id = %self.id,
            "pooled connection dropped without close, returning to pool"
        );
        self.pool.release_on_drop(self.id);
    }
}
