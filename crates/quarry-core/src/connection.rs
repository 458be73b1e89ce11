//! Connection and repository source traits

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::{Request, Result};

/// A live connection to a repository source
///
/// Connections are single-owner handles: the holder has exclusive use
/// until `close` is called. Implementations must tolerate `close` being
/// called more than once.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Execute a request against the repository
    async fn execute(&self, request: Request) -> Result<()>;

    /// Probe whether the connection is still usable
    ///
    /// Returns `Ok(true)` when the source answered within `timeout`,
    /// `Ok(false)` when it answered but is unusable. An error means the
    /// probe itself failed.
    async fn ping(&self, timeout: Duration) -> Result<bool>;

    /// Close the connection and release its resources
    async fn close(&self) -> Result<()>;
}

/// A pluggable repository backend
///
/// Sources mint connections on demand; they are the factory side of the
/// connection lifecycle and never pool anything themselves.
#[async_trait]
pub trait RepositorySource: Send + Sync {
    /// Name of this source, unique within a library
    fn name(&self) -> &str;

    /// Open a new connection to this source
    ///
    /// May be slow and may fail; callers decide whether to retry.
    async fn connect(&self) -> Result<Arc<dyn Connection>>;
}
