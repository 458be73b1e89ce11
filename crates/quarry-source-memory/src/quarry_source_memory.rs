//! In-memory repository source implementation

mod connection;
mod source;
#[cfg(test)]
mod source_tests;

pub use connection::MemoryConnection;
pub use source::MemorySource;
