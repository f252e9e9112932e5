//! Weighted constant-mean swap math
//!
//! For a pool holding balances `B_in`, `B_out` with weights `W_in`, `W_out`,
//! the output of a swap keeps `B_in^W_in * B_out^W_out` from decreasing:
//!
//! ```text
//! out = B_out * (1 - (B_in / (B_in + in * (1 - fee))) ^ (W_in / W_out))
//! ```

use crate::math::{mul_div, mul_div_wide, pow};
use wamm_types::{MathError, SCALE};

const SCALE_WIDE: u128 = SCALE as u128;

/// Inputs for a single-hop swap quote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapLeg {
    pub balance_in: u64,
    pub weight_in: u64,
    pub balance_out: u64,
    pub weight_out: u64,
}

/// Weighted swap math functions
pub struct WeightedSwapMath;

impl WeightedSwapMath {
    /// Calculate the output amount for a weighted swap
    ///
    /// # Arguments
    /// * `leg` - Balances and weights of the input and output assets
    /// * `amount_in` - Amount of the input asset paid in
    /// * `fee` - Swap fee as a fraction of `SCALE`
    ///
    /// # Returns
    /// Output amount, never more than `leg.balance_out`. An input so large that
    /// the balance ratio truncates to zero drains the whole output balance.
    pub fn calculate_output_amount(
        leg: &SwapLeg,
        amount_in: u64,
        fee: u64,
    ) -> Result<u64, MathError> {
        let amount_in_with_fee = mul_div(amount_in, SCALE.saturating_sub(fee), SCALE)?;

        let denominator = leg.balance_in as u128 + amount_in_with_fee as u128;
        // balance_in / denominator <= 1, so the ratio always fits
        let ratio = mul_div_wide(leg.balance_in as u128, SCALE_WIDE, denominator)? as u64;

        let power = mul_div(leg.weight_in, SCALE, leg.weight_out)?;
        let ratio_pow = pow(ratio, power)?.min(SCALE_WIDE);

        let out = mul_div_wide(leg.balance_out as u128, SCALE_WIDE - ratio_pow, SCALE_WIDE)?;
        Ok(out as u64)
    }
}

/// Positional form of [`WeightedSwapMath::calculate_output_amount`]
pub fn calc_out(
    balance_in: u64,
    weight_in: u64,
    balance_out: u64,
    weight_out: u64,
    amount_in: u64,
    fee: u64,
) -> Result<u64, MathError> {
    let leg = SwapLeg {
        balance_in,
        weight_in,
        balance_out,
        weight_out,
    };
    WeightedSwapMath::calculate_output_amount(&leg, amount_in, fee)
}
