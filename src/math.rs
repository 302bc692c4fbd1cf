//! Constant-product AMM math
//!
//! Pure integer evaluation of the Uniswap V2 output formula. All
//! intermediates are computed in 512-bit space so no multiplication can
//! wrap at any operand width the chain can produce.

use uint::construct_uint;

construct_uint! {
    pub struct U256(4);
}

construct_uint! {
    pub struct U512(8);
}

/// Swap fee of 0.3%, applied as `amount_in * 997 / 1000`. Protocol
/// constants, not configuration.
pub const FEE_NUMERATOR: u64 = 997;
pub const FEE_DENOMINATOR: u64 = 1000;

/// Computes the output amount for a constant-product swap:
///
/// ```text
/// amount_in_with_fee = amount_in * 997
/// numerator          = amount_in_with_fee * reserve_out
/// denominator        = reserve_in * 1000 + amount_in_with_fee
/// amount_out         = numerator / denominator      (truncating)
/// ```
///
/// Reserves are capped at 112 bits by the pair's storage layout and
/// `amount_in` at 256 bits, so the numerator is bounded by
/// 2^(256+10+112) = 2^378 < 2^512. The quotient is strictly less than
/// `reserve_out`, so it always fits in `u128`.
///
/// Returns 0 for degenerate inputs (zero amount or an empty reserve);
/// callers reject empty reserves before quoting.
pub fn get_amount_out(amount_in: U256, reserve_in: u128, reserve_out: u128) -> u128 {
    if amount_in.is_zero() || reserve_in == 0 || reserve_out == 0 {
        return 0;
    }

    let amount_in = widen(amount_in);
    let reserve_in = U512::from(reserve_in);
    let reserve_out = U512::from(reserve_out);

    let amount_in_with_fee = amount_in * U512::from(FEE_NUMERATOR);
    let numerator = amount_in_with_fee * reserve_out;
    let denominator = reserve_in * U512::from(FEE_DENOMINATOR) + amount_in_with_fee;

    (numerator / denominator).as_u128()
}

fn widen(value: U256) -> U512 {
    let mut words = [0u64; 8];
    words[..4].copy_from_slice(&value.0);
    U512(words)
}
