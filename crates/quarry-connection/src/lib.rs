//! Quarry Connection - Repository connection pooling and source management
//!
//! This crate handles the lifecycle of connections to repository sources:
//! a bounded pool with dynamic sizing, optional validation before use, a
//! coordinated shutdown protocol, and the library that owns one pool per
//! registered source.

mod library;
pub mod pool;

pub use library::SourceLibrary;
pub use pool::{ConnectionPool, PoolConfig, PoolStats, PooledConnection, RunState};
