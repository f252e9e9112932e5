//! Pool state
//!
//! Plain data plus read-only helpers. All mutation goes through
//! [`crate::engine::PoolEngine`], which validates an operation in full before
//! committing any field.

use crate::liquidity::ContributionBook;
use crate::weights::{ScheduleStatus, WeightSchedule};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use wamm_types::{AccountId, AssetId, PoolError};

/// Complete state of one weighted pool
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolState {
    pub bootstrapped: bool,
    pub asset_ids: Vec<AssetId>,
    /// Static weights, replaced only when a schedule completes
    pub weights: Vec<u64>,
    pub balances: Vec<u64>,
    pub schedule: Option<WeightSchedule>,
    pub share_token: AssetId,
    /// Total share supply created at bootstrap
    pub share_supply: u64,
    /// Unissued shares still held by the pool
    pub share_reserve: u64,
    /// Shares destroyed by burns
    pub burned: u64,
    pub holdings: BTreeMap<AccountId, u64>,
    pub contributions: ContributionBook,
}

impl PoolState {
    /// Fresh state for a validated bootstrap
    pub fn bootstrapped(
        asset_ids: Vec<AssetId>,
        weights: Vec<u64>,
        share_token: AssetId,
        share_supply: u64,
    ) -> Self {
        let count = asset_ids.len();
        Self {
            bootstrapped: true,
            asset_ids,
            weights,
            balances: vec![0; count],
            schedule: None,
            share_token,
            share_supply,
            share_reserve: share_supply,
            burned: 0,
            holdings: BTreeMap::new(),
            contributions: ContributionBook::default(),
        }
    }

    pub fn require_bootstrapped(&self) -> Result<(), PoolError> {
        if self.bootstrapped {
            Ok(())
        } else {
            Err(PoolError::NotBootstrapped)
        }
    }

    pub fn asset_count(&self) -> usize {
        self.asset_ids.len()
    }

    pub fn check_index(&self, index: usize) -> Result<(), PoolError> {
        if index < self.asset_count() {
            Ok(())
        } else {
            Err(PoolError::InvalidAssetIndex {
                index,
                count: self.asset_count(),
            })
        }
    }

    /// Shares held outside the pool reserve
    pub fn circulating_shares(&self) -> u64 {
        self.share_supply
            .saturating_sub(self.share_reserve)
            .saturating_sub(self.burned)
    }

    pub fn shares_of(&self, account: AccountId) -> u64 {
        self.holdings.get(&account).copied().unwrap_or(0)
    }

    /// Weight of asset `index` at `now`, interpolated through any schedule
    pub fn effective_weight(&self, index: usize, now: u64) -> Option<u64> {
        let static_weight = *self.weights.get(index)?;
        Some(match &self.schedule {
            Some(schedule) => schedule.weight_at(index, static_weight, now),
            None => static_weight,
        })
    }

    pub fn effective_weights(&self, now: u64) -> Vec<u64> {
        (0..self.weights.len())
            .filter_map(|index| self.effective_weight(index, now))
            .collect()
    }

    /// Static weights as they stand once a finished schedule is folded in
    pub fn settled_weights(&self, now: u64) -> Vec<u64> {
        match &self.schedule {
            Some(schedule) if schedule.is_complete(now) => schedule.target_weights.clone(),
            _ => self.weights.clone(),
        }
    }

    pub fn schedule_status(&self, now: u64) -> Option<ScheduleStatus> {
        self.schedule
            .as_ref()
            .filter(|schedule| schedule.is_active())
            .map(|schedule| schedule.status(now))
    }

    /// Fold a finished schedule into the static weights
    ///
    /// Returns the new static weights when a schedule was folded in.
    pub fn finalize_schedule(&mut self, now: u64) -> Option<&[u64]> {
        let complete = self
            .schedule
            .as_ref()
            .is_some_and(|schedule| schedule.is_complete(now));
        if !complete {
            return None;
        }

        let schedule = self.schedule.take()?;
        self.weights = schedule.target_weights;
        Some(&self.weights)
    }
}
