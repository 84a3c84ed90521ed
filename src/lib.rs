//! # fanout-gateway
//!
//! An HTTP gateway that accepts a batch of outbound request descriptors,
//! executes them concurrently and answers with one result per descriptor in
//! the order they were submitted.
//!
//! ## Features
//!
//! - **Batch fan-out**: `POST /makeRequests` with `{"requests": [...]}`
//! - **Single requests**: `POST /makeRequest` with one descriptor
//! - **Failure isolation**: a bad or failing item never affects its siblings
//! - **Bounded concurrency**: per-batch in-flight limit, item and batch timeouts
//! - **Request log**: optional SeaORM-backed record of completed calls
//!
//! ## Gateway Mode
//!
//! ```rust,no_run
//! use fanout_gateway::{Config, Gateway};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/gateway.yaml").await?;
//!     let gateway = Gateway::new(config).await?;
//!     gateway.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Library Mode
//!
//! ```rust,no_run
//! use fanout_gateway::{BatchDispatcher, DispatchConfig, SubRequestDescriptor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dispatcher = BatchDispatcher::new(&DispatchConfig::default())?;
//!     let outcome = dispatcher
//!         .dispatch(vec![SubRequestDescriptor::new("GET", "http://localhost:8080/ping")])
//!         .await;
//!     println!("{:?}", outcome.results[0].status_code);
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod server;
pub mod storage;
pub mod utils;

// Re-export main types
pub use config::{Config, DispatchConfig};
pub use utils::error::{GatewayError, Result};

pub use core::dispatch::{
    BatchDispatcher, BatchOutcome, BatchSummary, CompletedCall, ExecutionResult, ItemError,
    SingleRequestExecutor, SubRequestDescriptor,
};
pub use storage::RequestLogStore;

use tracing::{debug, info};

/// The fan-out gateway: configuration plus a ready-to-start HTTP server
pub struct Gateway {
    config: Config,
    server: server::HttpServer,
}

impl Gateway {
    /// Create a new gateway instance
    pub async fn new(config: Config) -> Result<Self> {
        info!("Creating new gateway instance");

        config.validate()?;
        let server = server::HttpServer::new(&config).await?;

        Ok(Self { config, server })
    }

    /// Run the gateway server
    pub async fn run(self) -> Result<()> {
        let build = build_info();
        info!(
            version = build.version,
            git_hash = build.git_hash,
            "Starting fanout gateway"
        );
        debug!("Configuration: {:#?}", self.config);

        self.server.start().await
    }
}

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Gateway build information
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Build timestamp, seconds since the epoch
    pub build_time: &'static str,
    /// Git commit hash
    pub git_hash: &'static str,
    /// Rust version
    pub rust_version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: option_env!("BUILD_TIME").unwrap_or("unknown"),
            git_hash: option_env!("GIT_HASH").unwrap_or("unknown"),
            rust_version: option_env!("RUST_VERSION").unwrap_or("unknown"),
        }
    }
}

/// Build information captured at compile time
pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
