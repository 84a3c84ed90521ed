//! fanout-gateway - concurrent HTTP fan-out service
//!
//! Accepts batches of outbound request descriptors and answers with their
//! results in submission order.

#![allow(missing_docs)]

use clap::Parser;
use fanout_gateway::{Config, Gateway, Result};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "config/gateway.yaml";

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "gateway", version, about)]
struct Cli {
    /// Path to a YAML config file (default: config/gateway.yaml if present)
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Bind host, overrides config and environment
    #[arg(long)]
    host: Option<String>,

    /// Bind port, overrides config and environment
    #[arg(short, long)]
    port: Option<u16>,

    /// Emit logs as JSON lines
    #[arg(long, env = "GATEWAY_LOG_JSON")]
    log_json: bool,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn load_config(cli: &Cli) -> Result<Config> {
    let default_path = PathBuf::from(DEFAULT_CONFIG_PATH);
    let path = match &cli.config {
        Some(path) => Some(path.clone()),
        None if default_path.exists() => Some(default_path),
        None => None,
    };

    let mut config = match path {
        Some(path) => Config::from_file(&path).await?.with_env_overrides()?,
        None => {
            warn!("No configuration file found, using defaults and environment");
            Config::from_env()?
        }
    };

    if let Some(host) = &cli.host {
        config.gateway.server.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.gateway.server.port = port;
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let result = async {
        let config = load_config(&cli).await?;
        info!(
            address = %config.server().address(),
            max_concurrency = config.dispatch().max_concurrency,
            "Configuration loaded"
        );
        Gateway::new(config).await?.run().await
    }
    .await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Display keeps multi-line bind errors readable
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
