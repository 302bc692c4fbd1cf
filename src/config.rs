//! Configuration management for the estimator service

use anyhow::Result;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EstimatorConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ethereum: EthereumConfig,
    #[serde(default)]
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    pub enable_cors: bool,
    #[validate(range(min = 5, max = 300))]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct EthereumConfig {
    /// Ethereum node RPC URL. Required; there is no usable default.
    pub rpc_url: String,
    #[validate(range(min = 1, max = 60))]
    pub connect_timeout_secs: u64,
    #[validate(range(min = 1, max = 300))]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct MonitoringConfig {
    pub log_level: String,
    pub structured_logging: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:1337".to_string(),
            enable_cors: true,
            request_timeout_secs: 30,
        }
    }
}

impl Default for EthereumConfig {
    fn default() -> Self {
        Self {
            rpc_url: String::new(),
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
        }
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            structured_logging: false,
        }
    }
}

impl EstimatorConfig {
    /// Load configuration from file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply environment variable overrides (ETH_RPC_URL, ADDR, LOG_LEVEL).
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("ETH_RPC_URL") {
            if !url.is_empty() {
                self.ethereum.rpc_url = url;
            }
        }
        if let Ok(addr) = std::env::var("ADDR") {
            if !addr.is_empty() {
                self.server.bind_address = addr;
            }
        }
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            if !level.is_empty() {
                self.monitoring.log_level = level;
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        Validate::validate(&self.server)?;
        Validate::validate(&self.ethereum)?;
        Validate::validate(&self.monitoring)?;

        if self.ethereum.rpc_url.is_empty() {
            return Err(anyhow::anyhow!(
                "Ethereum RPC URL cannot be empty (set ETH_RPC_URL or [ethereum] rpc_url)"
            ));
        }
        Ok(())
    }
}
