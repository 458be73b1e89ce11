//! Quarry Core - Core abstractions for the content repository platform
//!
//! This crate provides the fundamental traits and types that all other
//! Quarry crates depend on. It defines:
//!
//! - `RepositorySource` - Trait for pluggable repository backends
//! - `Connection` - Trait for live connections to a repository source
//! - `Request` - The unit of work a connection executes
//! - `QuarryError` - The common error type

mod connection;
mod error;
mod request;

pub use connection::*;
pub use error::*;
pub use request::*;
