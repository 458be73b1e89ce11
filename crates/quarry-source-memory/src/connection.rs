//! In-memory repository connection

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use quarry_core::{Connection, QuarryError, Request, Result};

use crate::source::NodeStore;

/// A connection to an in-memory repository
pub struct MemoryConnection {
    nodes: NodeStore,
    workspace: String,
    latency: Option<Duration>,
    fail_pings: Arc<AtomicU32>,
    closed: AtomicBool,
    closed_counter: Arc<AtomicUsize>,
}

impl MemoryConnection {
    pub(crate) fn new(
        nodes: NodeStore,
        workspace: String,
        latency: Option<Duration>,
        fail_pings: Arc<AtomicU32>,
        closed_counter: Arc<AtomicUsize>,
    ) -> Self {
        Self {
            nodes,
            workspace,
            latency,
            fail_pings,
            closed: AtomicBool::new(false),
            closed_counter,
        }
    }

    fn guard_open(&self) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(QuarryError::ConnectionClosed);
        }
        Ok(())
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl Connection for MemoryConnection {
    async fn execute(&self, request: Request) -> Result<()> {
        self.guard_open()?;
        self.simulate_latency().await;
        match request {
            Request::ReadNode { path } => {
                if !self.nodes.read().contains_key(&path) {
                    return Err(QuarryError::NotFound(format!("No node at '{path}'")));
                }
                Ok(())
            }
            Request::WriteNode { path, properties } => {
                self.nodes.write().insert(path, properties);
                Ok(())
            }
            Request::RemoveNode { path } => {
                if self.nodes.write().remove(&path).is_none() {
                    return Err(QuarryError::NotFound(format!("No node at '{path}'")));
                }
                Ok(())
            }
            Request::VerifyWorkspace { name } => {
                if name != self.workspace {
                    return Err(QuarryError::NotFound(format!(
                        "No workspace named '{name}'"
                    )));
                }
                Ok(())
            }
        }
    }

    async fn ping(&self, timeout: Duration) -> Result<bool> {
        if self.closed.load(Ordering::SeqCst) {
            return Ok(false);
        }
        // A backend slower than the caller's budget reports itself
        // unusable within that budget.
        if let Some(latency) = self.latency
            && latency > timeout
        {
            tokio::time::sleep(timeout).await;
            return Ok(false);
        }
        self.simulate_latency().await;
        let failing = self
            .fail_pings
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        Ok(!failing)
    }

    async fn close(&self) -> Result<()> {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.closed_counter.fetch_add(1, Ordering::SeqCst);
            tracing::debug!("memory connection closed");
        }
        Ok(())
    }
}
