//! Swap estimation service

use std::sync::Arc;

use tracing::debug;

use crate::error::{EstimateError, EstimateResult};
use crate::math::{self, U256};
use crate::pair::{self, PairState};
use crate::rpc_client::StorageReader;
use crate::types::Address;

/// Estimates swap outputs by reading pair storage at the current chain head
/// and applying the constant-product formula locally. Stateless: every call
/// performs a fresh read, nothing is cached between requests.
pub struct EstimateService {
    reader: Arc<dyn StorageReader>,
}

impl EstimateService {
    pub fn new(reader: Arc<dyn StorageReader>) -> Self {
        Self { reader }
    }

    /// Compute the expected output of swapping `amount_in` of `src` for
    /// `dst` through `pool` at the latest block.
    pub async fn estimate(
        &self,
        pool: Address,
        src: Address,
        dst: Address,
        amount_in: U256,
    ) -> EstimateResult<u128> {
        debug!(
            "estimating swap: pool={} src={} dst={} in={}",
            pool, src, dst, amount_in
        );

        if src == dst {
            return Err(EstimateError::SameToken);
        }

        // Pin one block before any storage read so all three observe the
        // same snapshot.
        let block = self
            .reader
            .block_number()
            .await
            .map_err(|e| EstimateError::ReadFailure(format!("block number: {e:#}")))?;

        let state = pair::read_pair_state(self.reader.as_ref(), pool, block)
            .await
            .map_err(|e| EstimateError::ReadFailure(format!("{e:#}")))?;

        let (reserve_in, reserve_out) = resolve_direction(&state, src, dst)?;

        if reserve_in == 0 || reserve_out == 0 {
            return Err(EstimateError::EmptyReserves);
        }

        let amount_out = math::get_amount_out(amount_in, reserve_in, reserve_out);
        debug!("amount out computed: {} (block {})", amount_out, block);
        Ok(amount_out)
    }
}

/// Map the requested trade direction onto the pair's reserves.
fn resolve_direction(state: &PairState, src: Address, dst: Address) -> EstimateResult<(u128, u128)> {
    if src == state.token0 && dst == state.token1 {
        Ok((state.reserve0, state.reserve1))
    } else if src == state.token1 && dst == state.token0 {
        Ok((state.reserve1, state.reserve0))
    } else {
        Err(EstimateError::PairMismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pair::{RESERVES_SLOT, TOKEN0_SLOT, TOKEN1_SLOT};
    use crate::types::StorageWord;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use std::collections::HashMap;

    const POOL: &str = "0x0d4a11d5eeaac28ec3f61d100daf4d40471f1852";
    const TOKEN0: &str = "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2";
    const TOKEN1: &str = "0xdac17f958d2ee523a2206206994597c13d831ec7";
    const OTHER: &str = "0x6b175474e89094c44da98b954eedeac495271d0f";

    fn addr(s: &str) -> Address {
        Address::from_hex(s).unwrap()
    }

    fn address_word(addr: Address) -> StorageWord {
        let mut bytes = [0u8; 32];
        bytes[12..].copy_from_slice(addr.as_bytes());
        StorageWord::new(bytes)
    }

    fn reserves_word(reserve0: u128, reserve1: u128) -> StorageWord {
        let value = U256::from(reserve0) | (U256::from(reserve1) << 112);
        let mut bytes = [0u8; 32];
        value.to_big_endian(&mut bytes);
        StorageWord::new(bytes)
    }

    struct FakeStorage {
        block: u64,
        slots: HashMap<u64, StorageWord>,
        fail: bool,
    }

    impl FakeStorage {
        fn pool(reserve0: u128, reserve1: u128) -> Self {
            Self {
                block: 18_000_000,
                slots: HashMap::from([
                    (TOKEN0_SLOT, address_word(addr(TOKEN0))),
                    (TOKEN1_SLOT, address_word(addr(TOKEN1))),
                    (RESERVES_SLOT, reserves_word(reserve0, reserve1)),
                ]),
                fail: false,
            }
        }
    }

    #[async_trait]
    impl StorageReader for FakeStorage {
        async fn block_number(&self) -> Result<u64> {
            if self.fail {
                return Err(anyhow!("node unreachable"));
            }
            Ok(self.block)
        }

        async fn storage_at(
            &self,
            _contract: Address,
            slot: u64,
            _block: u64,
        ) -> Result<StorageWord> {
            if self.fail {
                return Err(anyhow!("node unreachable"));
            }
            Ok(self.slots.get(&slot).copied().unwrap_or(StorageWord::ZERO))
        }
    }

    fn service(storage: FakeStorage) -> EstimateService {
        EstimateService::new(Arc::new(storage))
    }

    #[tokio::test]
    async fn quotes_token0_to_token1() {
        let svc = service(FakeStorage::pool(1_000_000, 2_000_000));
        let out = svc
            .estimate(addr(POOL), addr(TOKEN0), addr(TOKEN1), U256::from(1_000u64))
            .await
            .unwrap();
        assert_eq!(out, 1992);
    }

    #[tokio::test]
    async fn quotes_token1_to_token0() {
        let svc = service(FakeStorage::pool(1_000_000, 2_000_000));
        let out = svc
            .estimate(addr(POOL), addr(TOKEN1), addr(TOKEN0), U256::from(1_000u64))
            .await
            .unwrap();
        // reserve_in = 2_000_000, reserve_out = 1_000_000:
        // floor(997_000 * 1_000_000 / 2_000_997_000) = 498
        assert_eq!(out, 498);
    }

    #[tokio::test]
    async fn direction_resolution_is_symmetric() {
        let forward = service(FakeStorage::pool(1_000_000, 2_000_000))
            .estimate(addr(POOL), addr(TOKEN0), addr(TOKEN1), U256::from(1_000u64))
            .await
            .unwrap();
        // Swap (src, dst) and (reserve0, reserve1) together.
        let mirrored = service(FakeStorage::pool(2_000_000, 1_000_000))
            .estimate(addr(POOL), addr(TOKEN1), addr(TOKEN0), U256::from(1_000u64))
            .await
            .unwrap();
        assert_eq!(forward, mirrored);
    }

    #[tokio::test]
    async fn same_token_fails_before_any_read() {
        // The failing reader proves the check happens before chain access.
        let svc = service(FakeStorage {
            block: 0,
            slots: HashMap::new(),
            fail: true,
        });
        let err = svc
            .estimate(addr(POOL), addr(TOKEN0), addr(TOKEN0), U256::from(1u64))
            .await
            .unwrap_err();
        assert!(matches!(err, EstimateError::SameToken));
    }

    #[tokio::test]
    async fn unknown_tokens_fail_with_pair_mismatch() {
        let svc = service(FakeStorage::pool(1_000_000, 2_000_000));
        let err = svc
            .estimate(addr(POOL), addr(OTHER), addr(TOKEN1), U256::from(1u64))
            .await
            .unwrap_err();
        assert!(matches!(err, EstimateError::PairMismatch));

        let svc = service(FakeStorage::pool(1_000_000, 2_000_000));
        let err = svc
            .estimate(addr(POOL), addr(TOKEN0), addr(OTHER), U256::from(1u64))
            .await
            .unwrap_err();
        assert!(matches!(err, EstimateError::PairMismatch));
    }

    #[tokio::test]
    async fn half_matched_pair_fails() {
        // src is in the pair but dst is not.
        let svc = service(FakeStorage::pool(1_000_000, 2_000_000));
        let err = svc
            .estimate(addr(POOL), addr(TOKEN1), addr(OTHER), U256::from(1u64))
            .await
            .unwrap_err();
        assert!(matches!(err, EstimateError::PairMismatch));
    }

    #[tokio::test]
    async fn empty_reserves_fail() {
        for (r0, r1) in [(0u128, 2_000_000u128), (1_000_000, 0), (0, 0)] {
            let svc = service(FakeStorage::pool(r0, r1));
            let err = svc
                .estimate(addr(POOL), addr(TOKEN0), addr(TOKEN1), U256::from(1u64))
                .await
                .unwrap_err();
            assert!(matches!(err, EstimateError::EmptyReserves), "r0={r0} r1={r1}");
        }
    }

    #[tokio::test]
    async fn unreachable_node_surfaces_as_read_failure() {
        let svc = service(FakeStorage {
            block: 0,
            slots: HashMap::new(),
            fail: true,
        });
        let err = svc
            .estimate(addr(POOL), addr(TOKEN0), addr(TOKEN1), U256::from(1u64))
            .await
            .unwrap_err();
        assert!(matches!(err, EstimateError::ReadFailure(_)));
    }

    #[tokio::test]
    async fn nonexistent_pool_reads_as_zeroed_pair() {
        // All-zero storage: the zero token addresses match nothing, so the
        // request fails direction resolution rather than pretending to quote.
        let svc = service(FakeStorage {
            block: 1,
            slots: HashMap::new(),
            fail: false,
        });
        let err = svc
            .estimate(addr(POOL), addr(TOKEN0), addr(TOKEN1), U256::from(1u64))
            .await
            .unwrap_err();
        assert!(matches!(err, EstimateError::PairMismatch));
    }
}
