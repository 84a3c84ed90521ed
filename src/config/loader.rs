//! Configuration loading utilities
//!
//! Environment overrides are applied on top of defaults or a loaded file.

use super::models::*;
use crate::utils::error::{GatewayError, Result};
use std::env;
use std::str::FromStr;
use tracing::debug;

impl GatewayConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Overlay environment variables onto this configuration
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        debug!("Applying configuration overrides from environment variables");
        self.apply_overrides(|key| env::var(key).ok())
    }

    /// Overlay values from `lookup` onto this configuration
    pub(crate) fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server configuration
        if let Some(host) = lookup("GATEWAY_HOST") {
            self.server.host = host;
        }
        if let Some(port) = parse_var(&lookup, "GATEWAY_PORT")? {
            self.server.port = port;
        }
        if let Some(workers) = parse_var(&lookup, "GATEWAY_WORKERS")? {
            self.server.workers = Some(workers);
        }
        if let Some(size) = parse_var(&lookup, "GATEWAY_MAX_BODY_SIZE")? {
            self.server.max_body_size = size;
        }

        // Dispatch configuration
        if let Some(limit) = parse_var(&lookup, "DISPATCH_MAX_CONCURRENCY")? {
            self.dispatch.max_concurrency = limit;
        }
        if let Some(ms) = parse_var::<u64, _>(&lookup, "DISPATCH_ITEM_TIMEOUT_MS")? {
            self.dispatch.item_timeout_ms = (ms > 0).then_some(ms);
        }
        if let Some(ms) = parse_var::<u64, _>(&lookup, "DISPATCH_BATCH_TIMEOUT_MS")? {
            self.dispatch.batch_timeout_ms = (ms > 0).then_some(ms);
        }
        if let Some(keep_alive) = parse_var(&lookup, "DISPATCH_KEEP_ALIVE")? {
            self.dispatch.keep_alive = keep_alive;
        }

        // Database configuration
        if let Some(url) = lookup("DATABASE_URL") {
            self.storage.database.url = url;
            self.storage.database.enabled = true;
        }
        if let Some(max_conn) = parse_var(&lookup, "DATABASE_MAX_CONNECTIONS")? {
            self.storage.database.max_connections = max_conn;
        }

        Ok(())
    }
}

/// Parse an optional variable, reporting the key on failure
fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| GatewayError::Config(format!("Invalid {}: {}", key, e))),
        None => Ok(None),
    }
}
