//! Source library for managing pooled repository sources

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use quarry_core::{QuarryError, RepositorySource, Result};

use crate::pool::{ConnectionPool, PoolConfig};

/// Keeps one connection pool per registered repository source
pub struct SourceLibrary {
    /// Pools keyed by source name
    pools: RwLock<HashMap<String, ConnectionPool>>,
}

impl SourceLibrary {
    /// Create an empty library
    pub fn new() -> Self {
        Self {
            pools: RwLock::new(HashMap::new()),
        }
    }

    /// Register a source and create its pool
    ///
    /// Returns the new pool, which is also retrievable by source name.
    /// Fails if a source with the same name is already registered or the
    /// pool config is invalid.
    #[tracing::instrument(skip(self, source, config), fields(source = %source.name()))]
    pub fn register(
        &self,
        source: Arc<dyn RepositorySource>,
        config: PoolConfig,
    ) -> Result<ConnectionPool> {
        let name = source.name().to_string();
        let mut pools = self.pools.write();
        if pools.contains_key(&name) {
            return Err(QuarryError::Configuration(format!(
                "source '{name}' is already registered"
            )));
        }
        let pool = ConnectionPool::new(source, config)?;
        pools.insert(name, pool.clone());
        drop(pools);
        tracing::info!("repository source registered");
        Ok(pool)
    }

    /// Get the pool for a registered source
    pub fn pool(&self, name: &str) -> Result<ConnectionPool> {
        self.pools
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| QuarryError::NotFound(format!("source '{name}' is not registered")))
    }

    /// Check whether a source is registered
    pub fn is_registered(&self, name: &str) -> bool {
        self.pools.read().contains_key(name)
    }

    /// Names of all registered sources, sorted
    pub fn source_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.pools.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Remove a source from the library
    ///
    /// Returns the removed pool, which is left running; shutting it down
    /// is up to the caller.
    #[tracing::instrument(skip(self))]
    pub fn deregister(&self, name: &str) -> Result<ConnectionPool> {
        let pool = self
            .pools
            .write()
            .remove(name)
            .ok_or_else(|| QuarryError::NotFound(format!("source '{name}' is not registered")))?;
        tracing::info!("repository source deregistered");
        Ok(pool)
    }

    /// Gracefully shut down every registered pool
    #[tracing::instrument(skip(self))]
    pub async fn shutdown_all(&self) {
        let pools: Vec<ConnectionPool> = self.pools.read().values().cloned().collect();
        tracing::info!(count = pools.len(), "shutting down all source pools");
        for pool in pools {
            pool.shutdown().await;
        }
    }

    /// Immediately shut down every registered pool
    #[tracing::instrument(skip(self))]
    pub async fn shutdown_all_now(&self) {
        let pools: Vec<ConnectionPool> = self.pools.read().values().cloned().collect();
        tracing::info!(count = pools.len(), "stopping all source pools");
        for pool in pools {
            pool.shutdown_now().await;
        }
    }

    /// Wait up to `timeout` for every registered pool to terminate
    ///
    /// Returns true only if all pools terminated within the budget.
    pub async fn await_termination_all(&self, timeout: Duration) -> bool {
        let pools: Vec<ConnectionPool> = self.pools.read().values().cloned().collect();
        let deadline = Instant::now() + timeout;
        for pool in pools {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if !pool.await_termination(remaining).await {
                return false;
            }
        }
        true
    }
}

impl Default for SourceLibrary {
    fn default() -> Self {
        Self::new()
    }
}
