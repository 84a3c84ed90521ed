//! Outbound dispatch configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::Semaphore;

/// Settings for the batch dispatcher and its HTTP client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Maximum in-flight sub-requests per batch, 0 for unbounded
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    /// Per-item deadline in milliseconds, covering send and body read
    #[serde(default = "default_item_timeout_ms")]
    pub item_timeout_ms: Option<u64>,
    /// Whole-batch deadline in milliseconds
    #[serde(default)]
    pub batch_timeout_ms: Option<u64>,
    /// TCP connect timeout in milliseconds
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Reuse outbound connections between sub-requests
    #[serde(default)]
    pub keep_alive: bool,
    /// User-Agent sent on outbound requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            item_timeout_ms: default_item_timeout_ms(),
            batch_timeout_ms: None,
            connect_timeout_ms: default_connect_timeout_ms(),
            keep_alive: false,
            user_agent: default_user_agent(),
        }
    }
}

impl DispatchConfig {
    /// Semaphore size, `None` when fan-out is unbounded
    pub fn concurrency_limit(&self) -> Option<usize> {
        (self.max_concurrency > 0).then_some(self.max_concurrency)
    }

    pub fn item_timeout(&self) -> Option<Duration> {
        self.item_timeout_ms.map(Duration::from_millis)
    }

    pub fn batch_timeout(&self) -> Option<Duration> {
        self.batch_timeout_ms.map(Duration::from_millis)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Validate dispatch configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_concurrency > Semaphore::MAX_PERMITS {
            return Err(format!(
                "Max concurrency cannot exceed {}",
                Semaphore::MAX_PERMITS
            ));
        }
        if self.item_timeout_ms == Some(0) {
            return Err("Item timeout cannot be 0 (omit it to disable)".to_string());
        }
        if self.batch_timeout_ms == Some(0) {
            return Err("Batch timeout cannot be 0 (omit it to disable)".to_string());
        }
        if self.connect_timeout_ms == 0 {
            return Err("Connect timeout cannot be 0".to_string());
        }
        if self.user_agent.is_empty() {
            return Err("User agent cannot be empty".to_string());
        }
        Ok(())
    }
}

fn default_max_concurrency() -> usize {
    64
}

fn default_item_timeout_ms() -> Option<u64> {
    Some(30_000)
}

fn default_connect_timeout_ms() -> u64 {
    10_000
}

fn default_user_agent() -> String {
    format!("fanout-gateway/{}", env!("CARGO_PKG_VERSION"))
}
