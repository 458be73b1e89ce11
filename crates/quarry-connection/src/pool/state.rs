//! Pool run state

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a connection pool
///
/// The state only moves forward: `Running` to `ShuttingDown` (graceful) or
/// `Stopping` (immediate), then to `Terminated` once the last connection
/// is destroyed. It never regresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// Accepting acquires and creating connections
    Running,
    /// Graceful shutdown requested; in-use connections drain out naturally
    ShuttingDown,
    /// Immediate shutdown requested; in-use connections are force-closed
    Stopping,
    /// All connections destroyed, nothing left to wait for
    Terminated,
}

impl RunState {
    /// Pool accepts acquires
    pub fn is_running(&self) -> bool {
        matches!(self, RunState::Running)
    }

    /// Shutdown has been requested, whether or not it has completed
    pub fn is_shutdown(&self) -> bool {
        !self.is_running()
    }

    /// Shutdown requested but connections are still open
    pub fn is_terminating(&self) -> bool {
        matches!(self, RunState::ShuttingDown | RunState::Stopping)
    }

    /// All connections destroyed
    pub fn is_terminated(&self) -> bool {
        matches!(self, RunState::Terminated)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Running => "running",
            RunState::ShuttingDown => "shutting-down",
            RunState::Stopping => "stopping",
            RunState::Terminated => "terminated",
        };
        f.write_str(name)
    }
}
