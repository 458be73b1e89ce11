//! Pool configuration types

use std::time::Duration;

use quarry_core::{QuarryError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for a repository connection pool
///
/// Controls pool sizing, validation, and retry behavior. All values can
/// also be changed on a live pool through its setters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Number of connections the pool keeps open even when idle
    core_size: usize,
    /// Maximum number of connections the pool may hold, idle plus in-use
    max_size: usize,
    /// Advisory time in milliseconds an idle connection above the core
    /// size may live before it is eligible for reclamation
    keep_alive_ms: u64,
    /// Timeout in milliseconds for the validation ping
    ping_timeout_ms: u64,
    /// Whether connections are pinged before being handed out
    validate_before_use: bool,
    /// Consecutive validation failures tolerated before an acquire fails
    max_failed_attempts: u32,
}

impl PoolConfig {
    /// Create a new pool configuration with the given core and maximum sizes
    ///
    /// The bounds are checked by [`PoolConfig::validate`] when the pool is
    /// constructed, not here.
    pub fn new(core_size: usize, max_size: usize) -> Self {
        Self {
            core_size,
            max_size,
            keep_alive_ms: 30_000,  // 30 seconds default
            ping_timeout_ms: 5_000, // 5 seconds default
            validate_before_use: true,
            max_failed_attempts: 10,
        }
    }

    /// Set the advisory keep-alive time in milliseconds
    pub fn with_keep_alive_ms(mut self, keep_alive_ms: u64) -> Self {
        self.keep_alive_ms = keep_alive_ms;
        self
    }

    /// Set the validation ping timeout in milliseconds
    pub fn with_ping_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.ping_timeout_ms = timeout_ms;
        self
    }

    /// Enable or disable validation before handing out a connection
    pub fn with_validate_before_use(mut self, validate: bool) -> Self {
        self.validate_before_use = validate;
        self
    }

    /// Set how many consecutive validation failures an acquire tolerates
    pub fn with_max_failed_attempts(mut self, attempts: u32) -> Self {
        self.max_failed_attempts = attempts;
        self
    }

    /// Get the core pool size
    pub fn core_size(&self) -> usize {
        self.core_size
    }

    /// Get the maximum pool size
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Get the advisory keep-alive time as a Duration
    pub fn keep_alive(&self) -> Duration {
        Duration::from_millis(self.keep_alive_ms)
    }

    /// Get the validation ping timeout as a Duration
    pub fn ping_timeout(&self) -> Duration {
        Duration::from_millis(self.ping_timeout_ms)
    }

    /// Whether connections are validated before use
    pub fn validate_before_use(&self) -> bool {
        self.validate_before_use
    }

    /// Get the failed-attempt bound for validation retries
    pub fn max_failed_attempts(&self) -> u32 {
        self.max_failed_attempts
    }

    /// Check the configuration for invalid values
    pub fn validate(&self) -> Result<()> {
        if self.max_size == 0 {
            return Err(QuarryError::Configuration(
                "max_size must be greater than 0".into(),
            ));
        }
        if self.core_size > self.max_size {
            return Err(QuarryError::Configuration(format!(
                "core_size ({}) cannot exceed max_size ({})",
                self.core_size, self.max_size
            )));
        }
        if self.max_failed_attempts == 0 {
            return Err(QuarryError::Configuration(
                "max_failed_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for PoolConfig {
    /// Create a default pool configuration
    ///
    /// Defaults:
    /// - core_size: 1
    /// - max_size: 10
    /// - keep_alive: 30 seconds
    /// - ping_timeout: 5 seconds
    /// - validate_before_use: true
    /// - max_failed_attempts: 10
    fn default() -> Self {
        Self::new(1, 10)
    }
}
