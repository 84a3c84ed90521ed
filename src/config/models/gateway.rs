//! Main gateway configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Main gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GatewayConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Outbound dispatch configuration
    #[serde(default)]
    pub dispatch: DispatchConfig,
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
}
