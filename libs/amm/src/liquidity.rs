//! Pool-share minting and burning math, plus the per-depositor contribution
//! ledger that feeds minting

use crate::math::{mul_div, mul_div_wide, pow};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use wamm_types::{AccountId, MathError, PoolError, SCALE};

const SCALE_WIDE: u128 = SCALE as u128;

/// Deposits made since each depositor's last mint, indexed like the pool assets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionBook {
    entries: BTreeMap<AccountId, Vec<u64>>,
}

impl ContributionBook {
    /// Amount to record after adding `amount` to the depositor's entry for `index`
    ///
    /// Does not mutate; pair with [`ContributionBook::set`] once the deposit commits.
    pub fn credited(
        &self,
        depositor: AccountId,
        index: usize,
        amount: u64,
    ) -> Result<u64, PoolError> {
        let current = self
            .entries
            .get(&depositor)
            .and_then(|entry| entry.get(index).copied())
            .unwrap_or(0);
        current
            .checked_add(amount)
            .ok_or(PoolError::BalanceOverflow { index })
    }

    pub fn set(&mut self, depositor: AccountId, index: usize, value: u64, asset_count: usize) {
        let entry = self
            .entries
            .entry(depositor)
            .or_insert_with(|| vec![0; asset_count]);
        if entry.len() < asset_count {
            entry.resize(asset_count, 0);
        }
        entry[index] = value;
    }

    pub fn get(&self, depositor: AccountId) -> Option<&[u64]> {
        self.entries.get(&depositor).map(Vec::as_slice)
    }

    /// Contribution vector if the depositor has anything pending
    pub fn pending(&self, depositor: AccountId) -> Option<&[u64]> {
        self.get(depositor)
            .filter(|entry| entry.iter().any(|&amount| amount > 0))
    }

    /// Zero the depositor's entry after a mint
    pub fn clear(&mut self, depositor: AccountId) {
        if let Some(entry) = self.entries.get_mut(&depositor) {
            entry.iter_mut().for_each(|amount| *amount = 0);
        }
    }
}

/// Share mint/burn math functions
pub struct LiquidityMath;

impl LiquidityMath {
    /// Shares owed for a contribution already credited to `balances`
    ///
    /// # Arguments
    /// * `balances` - Pool balances including the contribution
    /// * `weights` - Pricing weights, one per asset
    /// * `contribution` - Amount of each asset the depositor added
    /// * `circulating` - Shares currently outside the pool reserve
    /// * `initial_mint` - Shares issued when nothing circulates
    ///
    /// # Returns
    /// `circulating * prod((c_i / (b_i - c_i)) ^ w_i)`, or `initial_mint` for
    /// the first mint. Every asset needs a non-zero contribution and a non-zero
    /// balance before it.
    pub fn mint_amount(
        balances: &[u64],
        weights: &[u64],
        contribution: &[u64],
        circulating: u64,
        initial_mint: u64,
    ) -> Result<u64, PoolError> {
        if circulating == 0 {
            return Ok(initial_mint);
        }

        let mut product = SCALE_WIDE;

        for (index, (&balance, &weight)) in balances.iter().zip(weights).enumerate() {
            let contributed = contribution.get(index).copied().unwrap_or(0);
            if contributed == 0 {
                return Err(PoolError::MissingContribution { index });
            }

            let before = balance
                .checked_sub(contributed)
                .filter(|&before| before > 0)
                .ok_or(PoolError::ZeroBalance { index })?;

            let ratio = mul_div_wide(contributed as u128, SCALE_WIDE, before as u128)?;
            let ratio = u64::try_from(ratio).map_err(|_| MathError::Overflow)?;
            let powered = pow(ratio, weight)?;
            product = mul_div_wide(product, powered, SCALE_WIDE)?;
        }

        let minted = mul_div_wide(circulating as u128, product, SCALE_WIDE)?;
        Ok(u64::try_from(minted).map_err(|_| MathError::Overflow)?)
    }

    /// Per-asset payout for burning `share_amount` out of `circulating`
    pub fn burn_payouts(
        balances: &[u64],
        share_amount: u64,
        circulating: u64,
    ) -> Result<Vec<u64>, PoolError> {
        if share_amount == 0 {
            return Err(PoolError::ZeroAmount);
        }
        if share_amount > circulating {
            return Err(PoolError::InsufficientShares {
                requested: share_amount,
                held: circulating,
            });
        }

        balances
            .iter()
            .map(|&balance| mul_div(share_amount, balance, circulating).map_err(PoolError::from))
            .collect()
    }
}
