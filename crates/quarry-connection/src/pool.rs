//! Connection pooling for repository sources
//!
//! This module provides a bounded connection pool with dynamically
//! adjustable core and maximum sizes, optional ping validation before a
//! connection is handed out, and a multi-phase shutdown protocol with
//! awaitable termination.
//!
//! # Example
//!
//! ```ignore
//! use quarry_connection::pool::{ConnectionPool, PoolConfig};
//!
//! let config = PoolConfig::new(1, 10)
//!     .with_ping_timeout_ms(5_000)
//!     .with_validate_before_use(true);
//!
//! let pool = ConnectionPool::new(source, config)?;
//! let conn = pool.acquire().await?;
//! conn.execute(request).await?;
//! conn.close().await?;
//! // The pool decides whether the underlying connection is recycled
//! pool.shutdown().await;
//! assert!(pool.await_termination(Duration::from_secs(5)).await);
//! ```

mod config;
mod pool;
mod state;
mod stats;
mod wrapper;


pub use config::PoolConfig;
pub use pool::ConnectionPool;
pub use state::RunState;
pub use stats::PoolStats;
pub use wrapper::PooledConnection;
