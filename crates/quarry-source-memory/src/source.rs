//! In-memory repository source

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use quarry_core::{Connection, QuarryError, RepositorySource, Result};
use serde_json::Value;

use crate::connection::MemoryConnection;

/// Shared node storage, path to property map
pub(crate) type NodeStore = Arc<RwLock<HashMap<String, HashMap<String, Value>>>>;

/// Repository source backed by an in-process node store
///
/// Every connection opened from the same source sees the same nodes.
/// Optional latency and failure injection make the source useful for
/// exercising callers against slow or flaky backends.
pub struct MemorySource {
    name: String,

    /// The single workspace this source exposes
    workspace: String,

    nodes: NodeStore,

    /// Added to every operation when set
    latency: Option<Duration>,

    fail_connects: AtomicU32,
    fail_pings: Arc<AtomicU32>,

    opened: AtomicUsize,
    closed: Arc<AtomicUsize>,
}

impl MemorySource {
    /// Create a new in-memory source with a single "default" workspace
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            workspace: "default".to_string(),
            nodes: Arc::new(RwLock::new(HashMap::new())),
            latency: None,
            fail_connects: AtomicU32::new(0),
            fail_pings: Arc::new(AtomicU32::new(0)),
            opened: AtomicUsize::new(0),
            closed: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Set the workspace name this source exposes
    pub fn with_workspace(mut self, workspace: impl Into<String>) -> Self {
        self.workspace = workspace.into();
        self
    }

    /// Add an artificial delay to every connect, ping, and request
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make the next `count` connect calls fail
    pub fn fail_next_connects(&self, count: u32) {
        self.fail_connects.store(count, Ordering::SeqCst);
    }

    /// Make the next `count` pings fail, across all open connections
    pub fn fail_next_pings(&self, count: u32) {
        self.fail_pings.store(count, Ordering::SeqCst);
    }

    /// Connections opened over the source's lifetime
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    /// Connections closed over the source's lifetime
    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    /// Look up a node's properties by path
    pub fn node(&self, path: &str) -> Option<HashMap<String, Value>> {
        self.nodes.read().get(path).cloned()
    }

    /// Number of nodes currently stored
    pub fn node_count(&self) -> usize {
        self.nodes.read().len()
    }
}

#[async_trait]
impl RepositorySource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn connect(&self) -> Result<Arc<dyn Connection>> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let failing = self
            .fail_connects
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(QuarryError::Connection(format!(
                "Cannot connect to in-memory source '{}'",
                self.name
            )));
        }
        self.opened.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(source = %self.name, "memory connection opened");
        Ok(Arc::new(MemoryConnection::new(
            Arc::clone(&self.nodes),
            self.workspace.clone(),
            self.latency,
            Arc::clone(&self.fail_pings),
            Arc::clone(&self.closed),
        )))
    }
}
