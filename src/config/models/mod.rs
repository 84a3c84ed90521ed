//! Configuration data models
//!
//! This module defines all configuration structures used throughout the gateway.

pub mod dispatch;
pub mod gateway;
pub mod server;
pub mod storage;

// Re-export all configuration types
pub use dispatch::*;
pub use gateway::*;
pub use server::*;
pub use storage::*;

/// Default values for configuration
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    1234
}

/// Default maximum body size in bytes
pub fn default_max_body_size() -> usize {
    10 * 1024 * 1024 // 10MB
}

pub fn default_max_connections() -> u32 {
    10
}

pub fn default_connection_timeout() -> u64 {
    5
}
