//! Lightweight Ethereum RPC client
//!
//! A minimal JSON-RPC client that implements only the two methods the
//! estimator actually needs, avoiding the heavy dependency chain of a full
//! Ethereum client library.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::types::{Address, StorageWord};

/// Chain access seam consumed by the estimator. Tests implement this over
/// an in-memory slot map.
#[async_trait]
pub trait StorageReader: Send + Sync {
    /// Resolve the current chain head to a concrete block number.
    async fn block_number(&self) -> Result<u64>;

    /// Fetch the raw 32-byte value at (contract, slot) as of `block`.
    async fn storage_at(&self, contract: Address, slot: u64, block: u64) -> Result<StorageWord>;
}

/// Lightweight RPC client for an Ethereum node
pub struct EthRpcClient {
    url: String,
    agent: ureq::Agent,
}

/// RPC response wrapper
#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

/// RPC error structure
#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

impl EthRpcClient {
    /// Create a new lightweight RPC client
    pub fn new(url: String, connect_timeout: Duration, request_timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(connect_timeout)
            .timeout_read(request_timeout)
            .build();

        Self { url, agent }
    }

    /// Make a JSON-RPC call
    async fn call<T>(&self, method: &str, params: Value) -> Result<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let request_body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params
        });

        debug!("RPC call: {} with params: {:?}", method, params);

        // Use blocking call since ureq is sync
        let response_body = tokio::task::spawn_blocking({
            let agent = self.agent.clone();
            let url = self.url.clone();
            let body = request_body.to_string();

            move || {
                let response = agent
                    .post(&url)
                    .set("Content-Type", "application/json")
                    .send_string(&body)?;

                let text = response.into_string()?;
                Ok::<String, ureq::Error>(text)
            }
        })
        .await??;

        let rpc_response: RpcResponse<T> = serde_json::from_str(&response_body)?;

        if let Some(error) = rpc_response.error {
            return Err(anyhow!("RPC error {}: {}", error.code, error.message));
        }

        rpc_response
            .result
            .ok_or_else(|| anyhow!("No result in RPC response"))
    }
}

#[async_trait]
impl StorageReader for EthRpcClient {
    async fn block_number(&self) -> Result<u64> {
        let quantity: String = self.call("eth_blockNumber", json!([])).await?;
        parse_quantity(&quantity).context("invalid block number in response")
    }

    async fn storage_at(&self, contract: Address, slot: u64, block: u64) -> Result<StorageWord> {
        let params = json!([
            contract.to_string(),
            format!("{:#x}", slot),
            format!("{:#x}", block),
        ]);

        let data: String = self
            .call("eth_getStorageAt", params)
            .await
            .with_context(|| {
                format!("storage read failed (pool {contract}, slot {slot}, block {block})")
            })?;

        StorageWord::from_hex(&data).with_context(|| {
            format!("invalid storage word (pool {contract}, slot {slot}, block {block})")
        })
    }
}

/// Parse a JSON-RPC quantity string ("0x4b7"; nodes trim leading zeros).
fn parse_quantity(s: &str) -> Result<u64> {
    let stripped = s.strip_prefix("0x").unwrap_or(s);
    u64::from_str_radix(stripped, 16).map_err(|e| anyhow!("bad quantity {}: {}", s, e))
}
