//! Uniswap V2 pair storage layout
//!
//! A pair contract keeps its pair identity and reserves in three fixed
//! slots (determined by the contract's variable ordering):
//!
//! ```text
//! slot 6: token0 address, right-aligned in the 32-byte word
//! slot 7: token1 address, same encoding
//! slot 8: [reserve0: u112 | reserve1: u112 | blockTimestampLast: u32]
//!         packed from the least-significant bit upward
//! ```

use anyhow::Result;
use tracing::debug;

use crate::math::U256;
use crate::rpc_client::StorageReader;
use crate::types::{Address, StorageWord};

pub const TOKEN0_SLOT: u64 = 6;
pub const TOKEN1_SLOT: u64 = 7;
pub const RESERVES_SLOT: u64 = 8;

const RESERVE_BITS: usize = 112;

/// Pair tokens and reserves observed at a single block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairState {
    pub token0: Address,
    pub token1: Address,
    pub reserve0: u128,
    pub reserve1: u128,
}

/// Unpack the two uint112 reserves from the packed reserves word. The
/// trailing 32-bit timestamp is discarded.
pub fn unpack_reserves(word: StorageWord) -> (u128, u128) {
    let value = U256::from_big_endian(word.as_bytes());
    let mask = (U256::one() << RESERVE_BITS) - U256::one();

    let reserve0 = (value & mask).as_u128();
    let reserve1 = ((value >> RESERVE_BITS) & mask).as_u128();
    (reserve0, reserve1)
}

/// Read a pair's tokens and reserves at `block`.
///
/// All three slot reads carry the same block number and are issued
/// concurrently; a reserve update landing between reads cannot produce a
/// mixed snapshot. Any fetch failure propagates uninterpreted: a
/// non-existent pool reads as all-zero words and is not distinguishable
/// from a zeroed one here.
pub async fn read_pair_state<R: StorageReader + ?Sized>(
    reader: &R,
    pool: Address,
    block: u64,
) -> Result<PairState> {
    let (token0_result, token1_result, reserves_result) = tokio::join!(
        reader.storage_at(pool, TOKEN0_SLOT, block),
        reader.storage_at(pool, TOKEN1_SLOT, block),
        reader.storage_at(pool, RESERVES_SLOT, block),
    );

    let token0 = token0_result?.address();
    let token1 = token1_result?.address();
    let (reserve0, reserve1) = unpack_reserves(reserves_result?);

    let state = PairState {
        token0,
        token1,
        reserve0,
        reserve1,
    };
    debug!("pair state at block {}: {:?}", block, state);
    Ok(state)
}
