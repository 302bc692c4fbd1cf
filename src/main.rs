//! Uniswap V2 swap estimator service
//!
//! Wires configuration, logging, the Ethereum RPC client and the HTTP API
//! together to serve swap estimates computed from raw pair storage.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use univ2_estimator::api;
use univ2_estimator::config::EstimatorConfig;
use univ2_estimator::estimator::EstimateService;
use univ2_estimator::rpc_client::EthRpcClient;

#[derive(Parser)]
#[command(name = "univ2-estimator")]
#[command(about = "Uniswap V2 swap estimator")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "estimator.toml")]
    config: String,

    /// Override Ethereum RPC URL
    #[arg(long)]
    rpc_url: Option<String>,

    /// Override log level
    #[arg(long)]
    log_level: Option<String>,

    /// Dry run mode (validate config and exit)
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = if std::path::Path::new(&cli.config).exists() {
        EstimatorConfig::from_file(&cli.config)?
    } else {
        warn!("Config file not found, using defaults: {}", cli.config);
        EstimatorConfig::default()
    };

    config.apply_env_overrides();

    if let Some(rpc_url) = cli.rpc_url {
        config.ethereum.rpc_url = rpc_url;
    }
    if let Some(log_level) = cli.log_level {
        config.monitoring.log_level = log_level;
    }

    // Initialize logging
    init_logging(&config)?;

    info!("Starting Uniswap V2 estimator");
    info!("Bind address: {}", config.server.bind_address);

    config.validate()?;
    info!("Configuration validated successfully");

    if cli.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        return Ok(());
    }

    let client = Arc::new(EthRpcClient::new(
        config.ethereum.rpc_url.clone(),
        Duration::from_secs(config.ethereum.connect_timeout_secs),
        Duration::from_secs(config.ethereum.request_timeout_secs),
    ));
    let service = Arc::new(EstimateService::new(client));

    // Start API server
    info!("Starting API server on {}", config.server.bind_address);
    let api_server = api::start_server(service, &config.server).await?;

    // Wait for shutdown signal
    info!("Estimator started successfully. Press Ctrl+C to shutdown.");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
        _ = api_server => {
            info!("API server finished");
        }
    }

    info!("Shutting down Uniswap V2 estimator");
    Ok(())
}

fn init_logging(config: &EstimatorConfig) -> Result<()> {
    let log_level: tracing::Level = config
        .monitoring
        .log_level
        .parse()
        .unwrap_or(tracing::Level::INFO);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("univ2_estimator={},tower_http=info", log_level).into());

    if config.monitoring.structured_logging {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    Ok(())
}
