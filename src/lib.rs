//! Uniswap V2 swap estimator
//!
//! Estimates constant-product swap outputs by reading a pair's token and
//! reserve slots directly from contract storage over JSON-RPC, then applying
//! the 0.3%-fee formula locally with exact integer arithmetic.

pub mod api;
pub mod config;
pub mod error;
pub mod estimator;
pub mod math;
pub mod pair;
pub mod rpc_client;
pub mod types;

// Re-export commonly used types
pub use config::EstimatorConfig;
pub use error::{EstimateError, EstimateResult};
pub use estimator::EstimateService;
pub use math::U256;
pub use pair::PairState;
pub use rpc_client::{EthRpcClient, StorageReader};
pub use types::{Address, StorageWord};
