//! Repository connection pool implementation

use std::collections::{HashMap, VecDeque};
use std::pin::pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use quarry_core::{Connection, QuarryError, RepositorySource, Result};
use tokio::sync::{Notify, watch};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::config::PoolConfig;
use super::state::RunState;
use super::stats::PoolStats;
use super::wrapper::PooledConnection;

/// Bookkeeping for a connection currently checked out
struct InUseEntry {
    raw: Arc<dyn Connection>,
    /// Shared with the wrapper so an immediate shutdown can invalidate it
    closed: Arc<AtomicBool>,
}

/// What an acquire attempt should do next, decided under the lock
enum Checkout {
    /// Reuse an idle connection
    Reused(Arc<dyn Connection>),
    /// Capacity was reserved; create a new connection
    Create,
    /// Pool is at capacity; wait for a release
    Wait,
}

/// Outcome of settling a checked-out connection back into the pool
enum Settled {
    /// Connection went back to the idle queue
    Recycled,
    /// Connection must be destroyed; the flag is true when the pool just
    /// reached the terminated state
    Destroy(Arc<dyn Connection>, bool),
    /// Checkout was already settled elsewhere (for example by an
    /// immediate shutdown)
    Gone,
}

/// Mutable pool state, guarded by a single mutex
struct PoolCore {
    run_state: RunState,
    core_size: usize,
    max_size: usize,
    /// Total connections owned by the pool, whether idle, in use, or
    /// briefly held by an acquire in flight
    pool_size: usize,
    /// Idle connections in FIFO order
    idle: VecDeque<Arc<dyn Connection>>,
    /// Connections currently checked out, keyed by wrapper id
    in_use: HashMap<Uuid, InUseEntry>,
}

impl PoolCore {
    /// Move to terminated once a shutdown has drained the last connection.
    /// Returns true when the transition happened.
    fn maybe_terminate(&mut self) -> bool {
        if self.run_state.is_terminating() && self.pool_size == 0 {
            self.run_state = RunState::Terminated;
            true
        } else {
            false
        }
    }
}

/// Shared engine behind `ConnectionPool` and its wrappers
pub(super) struct PoolInner {
    source: Arc<dyn RepositorySource>,
    core: Mutex<PoolCore>,
    /// Wakes one blocked acquirer when a connection or capacity frees up
    returned: Notify,
    /// Broadcasts run-state changes to termination waiters
    state_tx: watch::Sender<RunState>,
    keep_alive_ms: AtomicU64,
    ping_timeout_ms: AtomicU64,
    validate_before_use: AtomicBool,
    max_failed_attempts: AtomicU32,
    total_created: AtomicU64,
    total_acquired: AtomicU64,
}

impl PoolInner {
    async fn acquire(self: &Arc<Self>, cancel: Option<&CancellationToken>) -> Result<PooledConnection> {
        match cancel {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(QuarryError::Cancelled),
                    result = self.acquire_inner() => result,
                }
            }
            None => self.acquire_inner().await,
        }
    }

    /// The acquisition loop: plan under the lock, act outside it
    async fn acquire_inner(self: &Arc<Self>) -> Result<PooledConnection> {
        let mut failed_attempts: u32 = 0;
        loop {
            let plan = {
                let mut core = self.core.lock();
                if !core.run_state.is_running() {
                    return Err(QuarryError::PoolNotRunning);
                }
                if core.pool_size < core.core_size {
                    // Below core, a new connection is created even when
                    // idle ones are available.
                    core.pool_size += 1;
                    Checkout::Create
                } else if let Some(raw) = core.idle.pop_front() {
                    Checkout::Reused(raw)
                } else if core.pool_size < core.max_size {
                    core.pool_size += 1;
                    Checkout::Create
                } else {
                    Checkout::Wait
                }
            };

            let raw = match plan {
                Checkout::Reused(raw) => raw,
                Checkout::Create => {
                    let reservation = Reservation::new(self);
                    let raw = self.source_connect().await?;
                    reservation.disarm();
                    raw
                }
                Checkout::Wait => {
                    self.wait_for_release().await;
                    continue;
                }
            };

            // From here until handout the connection is counted in
            // pool_size but belongs to neither collection; the guard keeps
            // the books straight if this future is dropped mid-flight.
            let limbo = LimboGuard::new(self, Arc::clone(&raw));

            if self.validate_before_use.load(Ordering::SeqCst) {
                let ping_timeout = Duration::from_millis(self.ping_timeout_ms.load(Ordering::SeqCst));
                let healthy = match tokio::time::timeout(ping_timeout, raw.ping(ping_timeout)).await {
                    Ok(Ok(usable)) => usable,
                    Ok(Err(error)) => {
                        tracing::debug!(source = %self.source.name(), error = %error, "validation ping errored");
                        false
                    }
                    Err(_) => {
                        tracing::debug!(
                            source = %self.source.name(),
                            timeout_ms = ping_timeout.as_millis() as u64,
                            "validation ping timed out"
                        );
                        false
                    }
                };
                if !healthy {
                    failed_attempts += 1;
                    limbo.disarm();
                    self.discard_limbo(raw).await;
                    let allowed = self.max_failed_attempts.load(Ordering::SeqCst);
                    if failed_attempts >= allowed {
                        tracing::warn!(
                            source = %self.source.name(),
                            attempts = failed_attempts,
                            "no usable connection after repeated validation failures"
                        );
                        return Err(QuarryError::AcquisitionExhausted(failed_attempts));
                    }
                    continue;
                }
            }

            // Hand out: enter the in-use set unless the pool stopped while
            // we were off the lock.
            let id = Uuid::new_v4();
            let closed = Arc::new(AtomicBool::new(false));
            let handed = {
                let mut core = self.core.lock();
                if core.run_state.is_running() {
                    core.in_use.insert(
                        id,
                        InUseEntry {
                            raw: Arc::clone(&raw),
                            closed: Arc::clone(&closed),
                        },
                    );
                    true
                } else {
                    false
                }
            };
            if !handed {
                limbo.disarm();
                self.discard_limbo(raw).await;
                return Err(QuarryError::PoolNotRunning);
            }
            limbo.disarm();
            self.total_acquired.fetch_add(1, Ordering::SeqCst);
            tracing::debug!(connection_id = %id, source = %self.source.name(), "connection acquired");
            return Ok(PooledConnection::new(id, raw, closed, Arc::clone(self)));
        }
    }

    /// Park until a connection is returned, capacity frees up, or the pool
    /// shuts down. May wake spuriously; callers re-plan in a loop.
    async fn wait_for_release(&self) {
        let mut notified = pin!(self.returned.notified());
        notified.as_mut().enable();
        // Re-check after arming the waiter so a release that slipped in
        // between planning and arming is not lost.
        {
            let core = self.core.lock();
            let actionable = !core.run_state.is_running()
                || !core.idle.is_empty()
                || core.pool_size < core.max_size;
            if actionable {
                return;
            }
        }
        notified.await;
    }

    /// Ask the source for a new connection; failures propagate unmasked
    async fn source_connect(&self) -> Result<Arc<dyn Connection>> {
        let raw = self.source.connect().await.map_err(|error| {
            tracing::error!(source = %self.source.name(), error = %error, "failed to create repository connection");
            error
        })?;
        self.total_created.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(source = %self.source.name(), "repository connection created");
        Ok(raw)
    }

    /// Open one idle connection if the pool is running and under its core
    /// size. Returns true when a connection was added.
    async fn add_idle_if_under_core(self: &Arc<Self>) -> Result<bool> {
        let reservation = {
            let mut core = self.core.lock();
            if !core.run_state.is_running() || core.pool_size >= core.core_size {
                return Ok(false);
            }
            core.pool_size += 1;
            Reservation::new(self)
        };
        let raw = self.source_connect().await?;
        let added = {
            let mut core = self.core.lock();
            if core.run_state.is_running() {
                core.idle.push_back(Arc::clone(&raw));
                true
            } else {
                false
            }
        };
        if added {
            reservation.disarm();
            self.returned.notify_one();
            return Ok(true);
        }
        // The pool shut down while the connection was being created.
        self.close_raw(raw).await;
        drop(reservation);
        Ok(false)
    }

    /// Return a checked-out connection to the pool
    pub(super) async fn release(&self, id: Uuid) {
        match self.settle(id) {
            Settled::Recycled | Settled::Gone => {}
            Settled::Destroy(raw, terminated) => {
                self.close_raw(raw).await;
                if terminated {
                    self.broadcast(RunState::Terminated);
                }
            }
        }
    }

    /// Return a checked-out connection from a synchronous drop
    pub(super) fn release_on_drop(self: &Arc<Self>, id: Uuid) {
        match self.settle(id) {
            Settled::Recycled | Settled::Gone => {}
            Settled::Destroy(raw, terminated) => {
                if let Ok(handle) = tokio::runtime::Handle::try_current() {
                    let inner = Arc::clone(self);
                    handle.spawn(async move {
                        inner.close_raw(raw).await;
                        if terminated {
                            inner.broadcast(RunState::Terminated);
                        }
                    });
                } else {
                    tracing::warn!("pooled connection dropped outside a runtime, skipping close");
                    if terminated {
                        self.broadcast(RunState::Terminated);
                    }
                }
            }
        }
    }

    /// Remove a checkout from the in-use set and decide its fate
    fn settle(&self, id: Uuid) -> Settled {
        let mut core = self.core.lock();
        let Some(entry) = core.in_use.remove(&id) else {
            // Already settled, for example force-closed by shutdown_now.
            return Settled::Gone;
        };
        if !core.run_state.is_running() || core.pool_size > core.max_size {
            core.pool_size -= 1;
            let terminated = core.maybe_terminate();
            drop(core);
            self.returned.notify_one();
            return Settled::Destroy(entry.raw, terminated);
        }
        // Recycle: the connection goes back in line and a fresh wrapper is
        // minted for it at the next checkout.
        core.idle.push_back(entry.raw);
        drop(core);
        self.returned.notify_one();
        Settled::Recycled
    }

    /// Destroy a connection that never made it into the in-use set
    ///
    /// The pool count is settled before the close so a caller dropped at
    /// the close's await point cannot strand the slot.
    async fn discard_limbo(&self, raw: Arc<dyn Connection>) {
        self.forget_limbo();
        self.close_raw(raw).await;
    }

    /// Remove one never-handed-out connection from the pool count
    fn forget_limbo(&self) {
        let terminated = {
            let mut core = self.core.lock();
            core.pool_size -= 1;
            core.maybe_terminate()
        };
        if terminated {
            self.broadcast(RunState::Terminated);
        }
        self.returned.notify_one();
    }

    /// Close an underlying connection whose bookkeeping is already settled.
    /// Close failures are logged and never block the pool.
    async fn close_raw(&self, raw: Arc<dyn Connection>) {
        if let Err(error) = raw.close().await {
            tracing::warn!(source = %self.source.name(), error = %error, "error closing repository connection");
        }
    }

    /// Publish a run-state change to termination waiters. Terminated is
    /// absorbing, so a stale broadcast can never regress past it.
    fn broadcast(&self, state: RunState) {
        self.state_tx.send_modify(|current| {
            if !current.is_terminated() {
                *current = state;
            }
        });
    }
}

/// Undoes a capacity reservation unless it was converted into a real
/// connection. Keeps `pool_size` honest when creation fails or the
/// acquire future is dropped mid-create.
struct Reservation<'a> {
    inner: &'a PoolInner,
    armed: bool,
}

impl<'a> Reservation<'a> {
    fn new(inner: &'a PoolInner) -> Self {
        Self { inner, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.inner.forget_limbo();
        }
    }
}

/// Keeps the books straight for a connection the pool holds outside both
/// collections. If the guard is dropped while armed (the acquire future
/// was cancelled mid-validation) the connection is closed on a background
/// task and removed from the pool count.
struct LimboGuard<'a> {
    inner: &'a Arc<PoolInner>,
    raw: Arc<dyn Connection>,
    armed: bool,
}

impl<'a> LimboGuard<'a> {
    fn new(inner: &'a Arc<PoolInner>, raw: Arc<dyn Connection>) -> Self {
        Self {
            inner,
            raw,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for LimboGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let inner = Arc::clone(self.inner);
            let raw = Arc::clone(&self.raw);
            handle.spawn(async move {
                inner.close_raw(raw).await;
                inner.forget_limbo();
            });
        } else {
            tracing::warn!("acquire dropped outside a runtime, skipping connection close");
            self.inner.forget_limbo();
        }
    }
}

/// A bounded pool of connections to a single repository source
///
/// The pool keeps up to `core_size` connections open even when idle and
/// grows on demand up to `max_size`. Acquires beyond the maximum block
/// until a connection is released. Both bounds can be changed while the
/// pool is in use; the pool converges on the new bounds by draining idle
/// connections immediately and destroying in-use ones as they come back.
///
/// Shutdown is a one-way state machine: `shutdown` lets checked-out
/// connections drain naturally, `shutdown_now` force-closes them, and
/// `await_termination` waits for the pool to reach the terminated state.
///
/// Cloning is cheap; all clones drive the same pool.
#[derive(Clone)]
pub struct ConnectionPool {
    inner: Arc<PoolInner>,
}

impl ConnectionPool {
    /// Create a new pool over the given repository source
    ///
    /// The pool starts running with zero connections; use the prestart
    /// methods to open core connections ahead of first use. Fails with a
    /// configuration error if the config is invalid.
    pub fn new(source: Arc<dyn RepositorySource>, config: PoolConfig) -> Result<Self> {
        config.validate()?;
        let (state_tx, _) = watch::channel(RunState::Running);
        tracing::debug!(
            source = %source.name(),
            core_size = config.core_size(),
            max_size = config.max_size(),
            "connection pool created"
        );
        let inner = PoolInner {
            source,
            core: Mutex::new(PoolCore {
                run_state: RunState::Running,
                core_size: config.core_size(),
                max_size: config.max_size(),
                pool_size: 0,
                idle: VecDeque::new(),
                in_use: HashMap::new(),
            }),
            returned: Notify::new(),
            state_tx,
            keep_alive_ms: AtomicU64::new(duration_to_ms(config.keep_alive())),
            ping_timeout_ms: AtomicU64::new(duration_to_ms(config.ping_timeout())),
            validate_before_use: AtomicBool::new(config.validate_before_use()),
            max_failed_attempts: AtomicU32::new(config.max_failed_attempts()),
            total_created: AtomicU64::new(0),
            total_acquired: AtomicU64::new(0),
        };
        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Acquire a connection from the pool
    ///
    /// In order: fails fast if the pool is not running; creates a new
    /// connection while under the core size; reuses an idle connection;
    /// creates one while under the maximum size; otherwise blocks until a
    /// connection is released or the pool shuts down. When validation is
    /// enabled each candidate is pinged first, and failed candidates are
    /// destroyed and replaced transparently up to the failed-attempt bound.
    ///
    /// The wait at capacity has no internal deadline. Callers that need
    /// one should wrap the future in a timeout or use [`Self::acquire_with`].
    pub async fn acquire(&self) -> Result<PooledConnection> {
        self.inner.acquire(None).await
    }

    /// Acquire a connection, giving up when `cancel` fires
    ///
    /// Cancellation surfaces as [`QuarryError::Cancelled`] and never hands
    /// out a connection.
    pub async fn acquire_with(&self, cancel: &CancellationToken) -> Result<PooledConnection> {
        self.inner.acquire(Some(cancel)).await
    }

    /// Change the core pool size
    ///
    /// Fails with a configuration error if `core_size` exceeds the maximum
    /// pool size, leaving the pool unchanged. Raising the value eagerly
    /// opens idle connections up to the new core size while the pool is
    /// running; lowering it drains now-excess idle connections. Stops at
    /// the first creation failure, keeping the connections already added.
    pub async fn set_core_pool_size(&self, core_size: usize) -> Result<()> {
        let drained = {
            let mut core = self.inner.core.lock();
            if core_size > core.max_size {
                return Err(QuarryError::Configuration(format!(
                    "core pool size ({}) cannot exceed maximum pool size ({})",
                    core_size, core.max_size
                )));
            }
            let previous = core.core_size;
            core.core_size = core_size;
            let mut drained = Vec::new();
            if core_size < previous {
                while core.pool_size > core.core_size {
                    let Some(raw) = core.idle.pop_front() else {
                        break;
                    };
                    core.pool_size -= 1;
                    drained.push(raw);
                }
            }
            drained
        };
        if !drained.is_empty() {
            tracing::info!(core_size, destroyed = drained.len(), "drained idle connections over the new core size");
        }
        for raw in drained {
            self.inner.close_raw(raw).await;
        }
        while self.inner.add_idle_if_under_core().await? {}
        Ok(())
    }

    /// Change the maximum pool size
    ///
    /// Fails with a configuration error if `max_size` is zero or below the
    /// core pool size, leaving the pool unchanged. Lowering the bound
    /// destroys surplus idle connections immediately; surplus in-use
    /// connections are destroyed as they are released. Raising it wakes
    /// blocked acquirers so they can grow the pool right away.
    pub async fn set_maximum_pool_size(&self, max_size: usize) -> Result<()> {
        if max_size == 0 {
            return Err(QuarryError::Configuration(
                "maximum pool size must be greater than 0".into(),
            ));
        }
        let (drained, raised) = {
            let mut core = self.inner.core.lock();
            if max_size < core.core_size {
                return Err(QuarryError::Configuration(format!(
                    "maximum pool size ({}) cannot be less than core pool size ({})",
                    max_size, core.core_size
                )));
            }
            let raised = max_size > core.max_size;
            core.max_size = max_size;
            let mut drained = Vec::new();
            while core.pool_size > core.max_size {
                let Some(raw) = core.idle.pop_front() else {
                    break;
                };
                core.pool_size -= 1;
                drained.push(raw);
            }
            (drained, raised)
        };
        if !drained.is_empty() {
            tracing::info!(max_size, destroyed = drained.len(), "drained idle connections over the new maximum");
        }
        for raw in drained {
            self.inner.close_raw(raw).await;
        }
        if raised {
            self.inner.returned.notify_waiters();
        }
        Ok(())
    }

    /// Get the core pool size
    pub fn core_pool_size(&self) -> usize {
        self.inner.core.lock().core_size
    }

    /// Get the maximum pool size
    pub fn maximum_pool_size(&self) -> usize {
        self.inner.core.lock().max_size
    }

    /// Open one idle connection if the pool is below its core size
    ///
    /// Returns true when a connection was added, false once the core size
    /// is reached or the pool is no longer running.
    pub async fn prestart_core_connection(&self) -> Result<bool> {
        self.inner.add_idle_if_under_core().await
    }

    /// Open idle connections until the pool reaches its core size
    ///
    /// Returns the number of connections added.
    pub async fn prestart_all_core_connections(&self) -> Result<usize> {
        let mut added = 0;
        while self.inner.add_idle_if_under_core().await? {
            added += 1;
        }
        Ok(added)
    }

    /// Get the advisory keep-alive time for idle connections above the
    /// core size
    pub fn keep_alive_time(&self) -> Duration {
        Duration::from_millis(self.inner.keep_alive_ms.load(Ordering::SeqCst))
    }

    /// Set the advisory keep-alive time
    pub fn set_keep_alive_time(&self, keep_alive: Duration) {
        self.inner
            .keep_alive_ms
            .store(duration_to_ms(keep_alive), Ordering::SeqCst);
    }

    /// Get the validation ping timeout
    pub fn ping_timeout(&self) -> Duration {
        Duration::from_millis(self.inner.ping_timeout_ms.load(Ordering::SeqCst))
    }

    /// Set the validation ping timeout
    pub fn set_ping_timeout(&self, timeout: Duration) {
        self.inner
            .ping_timeout_ms
            .store(duration_to_ms(timeout), Ordering::SeqCst);
    }

    /// Whether connections are pinged before being handed out
    pub fn validates_before_use(&self) -> bool {
        self.inner.validate_before_use.load(Ordering::SeqCst)
    }

    /// Enable or disable validation before use
    pub fn set_validate_before_use(&self, validate: bool) {
        self.inner
            .validate_before_use
            .store(validate, Ordering::SeqCst);
    }

    /// Get the failed-attempt bound for validation retries
    pub fn max_failed_attempts_before_error(&self) -> u32 {
        self.inner.max_failed_attempts.load(Ordering::SeqCst)
    }

    /// Set how many consecutive validation failures an acquire tolerates
    ///
    /// Fails with a configuration error if `attempts` is zero.
    pub fn set_max_failed_attempts_before_error(&self, attempts: u32) -> Result<()> {
        if attempts == 0 {
            return Err(QuarryError::Configuration(
                "max failed attempts must be at least 1".into(),
            ));
        }
        self.inner
            .max_failed_attempts
            .store(attempts, Ordering::SeqCst);
        Ok(())
    }

    /// Begin a graceful shutdown
    ///
    /// Idle connections are destroyed immediately; checked-out connections
    /// keep working and are destroyed as they are released. If nothing is
    /// checked out the pool terminates right away. Idempotent.
    pub async fn shutdown(&self) {
        let (drained, state) = {
            let mut core = self.inner.core.lock();
            if !core.run_state.is_running() {
                return;
            }
            let drained: Vec<_> = core.idle.drain(..).collect();
            core.pool_size -= drained.len();
            core.run_state = RunState::ShuttingDown;
            core.maybe_terminate();
            (drained, core.run_state)
        };
        tracing::info!(
            source = %self.inner.source.name(),
            destroyed_idle = drained.len(),
            state = %state,
            "connection pool shutting down"
        );
        for raw in drained {
            self.inner.close_raw(raw).await;
        }
        self.inner.broadcast(state);
        self.inner.returned.notify_waiters();
    }

    /// Shut down immediately
    ///
    /// Destroys idle connections and force-closes checked-out connections
    /// without waiting for their holders. Outstanding wrappers fail all
    /// further operations; their `close` stays an idempotent no-op.
    /// Escalates a graceful shutdown already in progress. Idempotent.
    pub async fn shutdown_now(&self) {
        let (victims, state) = {
            let mut core = self.inner.core.lock();
            if core.run_state.is_terminated() {
                return;
            }
            core.run_state = RunState::Stopping;
            let mut victims: Vec<Arc<dyn Connection>> = core.idle.drain(..).collect();
            for (_, entry) in core.in_use.drain() {
                entry.closed.store(true, Ordering::SeqCst);
                victims.push(entry.raw);
            }
            core.pool_size -= victims.len();
            core.maybe_terminate();
            (victims, core.run_state)
        };
        tracing::info!(
            source = %self.inner.source.name(),
            destroyed = victims.len(),
            state = %state,
            "connection pool stopping"
        );
        for raw in victims {
            self.inner.close_raw(raw).await;
        }
        self.inner.broadcast(state);
        self.inner.returned.notify_waiters();
    }

    /// Wait up to `timeout` for the pool to reach the terminated state
    ///
    /// Returns true if termination was observed within the budget. Any
    /// number of callers may wait concurrently.
    pub async fn await_termination(&self, timeout: Duration) -> bool {
        let mut state_rx = self.inner.state_tx.subscribe();
        match tokio::time::timeout(timeout, state_rx.wait_for(|state| state.is_terminated())).await
        {
            Ok(Ok(_)) => true,
            // The sender lives as long as the pool; read directly if the
            // channel is somehow gone.
            Ok(Err(_)) => self.is_terminated(),
            Err(_) => false,
        }
    }

    /// Pool accepts acquires
    pub fn is_running(&self) -> bool {
        self.inner.core.lock().run_state.is_running()
    }

    /// Shutdown has been requested, whether or not it has completed
    pub fn is_shutdown(&self) -> bool {
        self.inner.core.lock().run_state.is_shutdown()
    }

    /// Shutdown requested but connections are still open
    pub fn is_terminating(&self) -> bool {
        self.inner.core.lock().run_state.is_terminating()
    }

    /// All connections destroyed
    pub fn is_terminated(&self) -> bool {
        self.inner.core.lock().run_state.is_terminated()
    }

    /// Get the current run state
    pub fn run_state(&self) -> RunState {
        self.inner.core.lock().run_state
    }

    /// Total connections owned by the pool, idle plus in use
    pub fn pool_size(&self) -> usize {
        self.inner.core.lock().pool_size
    }

    /// Number of idle connections available for checkout
    pub fn idle_count(&self) -> usize {
        self.inner.core.lock().idle.len()
    }

    /// Number of connections currently checked out
    pub fn in_use_count(&self) -> usize {
        self.inner.core.lock().in_use.len()
    }

    /// Connections created over the pool's lifetime
    pub fn total_connections_created(&self) -> u64 {
        self.inner.total_created.load(Ordering::SeqCst)
    }

    /// Successful acquires over the pool's lifetime
    pub fn total_connections_acquired(&self) -> u64 {
        self.inner.total_acquired.load(Ordering::SeqCst)
    }

    /// Name of the repository source this pool serves
    pub fn source_name(&self) -> &str {
        self.inner.source.name()
    }

    /// Get a snapshot of the pool's current state
    pub fn stats(&self) -> PoolStats {
        let (run_state, pool_size, idle, in_use) = {
            let core = self.inner.core.lock();
            (
                core.run_state,
                core.pool_size,
                core.idle.len(),
                core.in_use.len(),
            )
        };
        PoolStats::new(
            run_state,
            pool_size,
            idle,
            in_use,
            self.inner.total_created.load(Ordering::SeqCst),
            self.inner.total_acquired.load(Ordering::SeqCst),
        )
    }
}

fn duration_to_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
