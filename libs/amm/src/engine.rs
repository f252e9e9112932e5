//! Pool engine
//!
//! [`PoolEngine`] owns one [`PoolState`] and applies operations to it. Each
//! mutating operation validates its inputs and computes its complete effect
//! against the current state before writing anything, so an `Err` always
//! leaves the state exactly as it was.
//!
//! Mutating operations take `&mut self`; queries take `&self` and never fail.

use crate::clock::{Clock, SystemClock};
use crate::liquidity::LiquidityMath;
use crate::operations::{
    BurnReceipt, MintReceipt, OperationOutcome, PoolOperation, SwapReceipt, Transfer,
};
use crate::pool::PoolState;
use crate::registry::pool_key;
use crate::swap::{SwapLeg, WeightedSwapMath};
use crate::weights::{normalize_weights, validate_weights, ScheduleStatus, WeightSchedule};
use std::collections::HashSet;
use tracing::{debug, info, warn};
use wamm_config::{EngineSettings, SwapWeightMode};
use wamm_types::{AccountId, AssetId, PoolError};

/// Engine for a single weighted pool
#[derive(Debug, Clone)]
pub struct PoolEngine<C: Clock = SystemClock> {
    state: PoolState,
    settings: EngineSettings,
    clock: C,
}

impl PoolEngine<SystemClock> {
    /// Engine on wall-clock time with an empty, un-bootstrapped pool
    pub fn new(settings: EngineSettings) -> Self {
        Self::with_clock(settings, SystemClock)
    }
}

impl<C: Clock> PoolEngine<C> {
    pub fn with_clock(settings: EngineSettings, clock: C) -> Self {
        Self::restore(PoolState::default(), settings, clock)
    }

    /// Resume from a previously saved state
    pub fn restore(state: PoolState, settings: EngineSettings, clock: C) -> Self {
        Self {
            state,
            settings,
            clock,
        }
    }

    pub fn state(&self) -> &PoolState {
        &self.state
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Dispatch a serialisable operation
    pub fn execute(&mut self, operation: PoolOperation) -> Result<OperationOutcome, PoolError> {
        let outcome = match operation {
            PoolOperation::Bootstrap { asset_ids, weights } => {
                let share_token = self.bootstrap(asset_ids, weights)?;
                OperationOutcome::Bootstrapped { share_token }
            }
            PoolOperation::AddLiquidity {
                depositor,
                index,
                amount,
            } => {
                let balance = self.add_liquidity(depositor, index, amount)?;
                OperationOutcome::LiquidityAdded { index, balance }
            }
            PoolOperation::GetLiquidity { depositor } => {
                OperationOutcome::Minted(self.get_liquidity(depositor)?)
            }
            PoolOperation::BurnLiquidity {
                depositor,
                share_amount,
            } => OperationOutcome::Burned(self.burn_liquidity(depositor, share_amount)?),
            PoolOperation::Swap {
                depositor,
                from,
                to,
                amount_in,
            } => OperationOutcome::Swapped(self.swap(depositor, from, to, amount_in)?),
            PoolOperation::ChangeWeights { duration, weights } => {
                let end_time = self.change_weights(duration, weights)?;
                OperationOutcome::WeightsScheduled { end_time }
            }
            PoolOperation::GetCurrentWeight { index } => OperationOutcome::Weight {
                weight: self.current_weight(index),
            },
            PoolOperation::GetBalance { index } => OperationOutcome::Balance {
                balance: self.balance(index),
            },
            PoolOperation::GetTotalAssets => OperationOutcome::TotalAssets {
                count: self.total_assets(),
            },
            PoolOperation::EstimateSwap {
                from,
                to,
                amount_in,
            } => OperationOutcome::Estimate {
                amount_out: self.estimate_swap(from, to, amount_in),
            },
            PoolOperation::GetSchedule => OperationOutcome::Schedule {
                status: self.schedule(),
            },
        };
        Ok(outcome)
    }

    /// Fix the pool's assets and initial weights
    ///
    /// # Returns
    /// Identity of the pool's share token, derived from the pool definition.
    pub fn bootstrap(
        &mut self,
        asset_ids: Vec<AssetId>,
        weights: Vec<u64>,
    ) -> Result<AssetId, PoolError> {
        if self.state.bootstrapped {
            return Err(PoolError::AlreadyBootstrapped);
        }
        if asset_ids.len() < 2 {
            return Err(PoolError::TooFewAssets {
                count: asset_ids.len(),
            });
        }

        let mut seen = HashSet::with_capacity(asset_ids.len());
        if let Some(duplicate) = asset_ids.iter().find(|asset| !seen.insert(**asset)) {
            return Err(PoolError::DuplicateAsset {
                asset: duplicate.inner(),
            });
        }

        validate_weights(&weights, asset_ids.len(), self.settings.weight_tolerance)?;

        let share_token = pool_key(&asset_ids, &weights)?.derived_asset_id();

        info!(
            "Pool bootstrapped: {} assets, weights={:?}, share token {}",
            asset_ids.len(),
            weights,
            share_token
        );

        self.state = PoolState::bootstrapped(
            asset_ids,
            weights,
            share_token,
            self.settings.share_supply,
        );
        Ok(share_token)
    }

    /// Credit a deposit to the pool balance and the depositor's contribution
    ///
    /// # Returns
    /// The asset's new pool balance.
    pub fn add_liquidity(
        &mut self,
        depositor: AccountId,
        index: usize,
        amount: u64,
    ) -> Result<u64, PoolError> {
        self.state.require_bootstrapped()?;
        self.state.check_index(index)?;
        if amount == 0 {
            return Err(PoolError::ZeroAmount);
        }

        let balance = self.state.balances[index]
            .checked_add(amount)
            .ok_or(PoolError::BalanceOverflow { index })?;
        let credited = self.state.contributions.credited(depositor, index, amount)?;
        let now = self.clock.now();

        self.finalize_schedule(now);
        self.state.balances[index] = balance;
        let asset_count = self.state.asset_count();
        self.state
            .contributions
            .set(depositor, index, credited, asset_count);

        debug!(
            "Deposit: {} added {} of asset index {} (balance {}, pending {})",
            depositor, amount, index, balance, credited
        );
        Ok(balance)
    }

    /// Mint shares for the depositor's pending contribution
    pub fn get_liquidity(&mut self, depositor: AccountId) -> Result<MintReceipt, PoolError> {
        self.state.require_bootstrapped()?;
        let contribution = self
            .state
            .contributions
            .pending(depositor)
            .ok_or(PoolError::NoContribution)?;

        let now = self.clock.now();
        let weights = self.pricing_weights(now);
        let circulating = self.state.circulating_shares();

        let minted = LiquidityMath::mint_amount(
            &self.state.balances,
            &weights,
            contribution,
            circulating,
            self.settings.initial_mint,
        )?;

        if minted > self.state.share_reserve {
            return Err(PoolError::InsufficientShareReserve {
                requested: minted,
                reserve: self.state.share_reserve,
            });
        }
        let holding = self.state.shares_of(depositor).saturating_add(minted);

        self.finalize_schedule(now);
        self.state.share_reserve -= minted;
        self.state.holdings.insert(depositor, holding);
        self.state.contributions.clear(depositor);

        info!(
            "Minted {} shares for {} (circulating {} -> {})",
            minted,
            depositor,
            circulating,
            circulating + minted
        );

        Ok(MintReceipt {
            depositor,
            minted,
            transfer: Transfer {
                asset: self.state.share_token,
                recipient: depositor,
                amount: minted,
            },
        })
    }

    /// Burn shares and pay out the pro-rata slice of every balance
    pub fn burn_liquidity(
        &mut self,
        depositor: AccountId,
        share_amount: u64,
    ) -> Result<BurnReceipt, PoolError> {
        self.state.require_bootstrapped()?;
        if share_amount == 0 {
            return Err(PoolError::ZeroAmount);
        }

        let held = self.state.shares_of(depositor);
        if held < share_amount {
            return Err(PoolError::InsufficientShares {
                requested: share_amount,
                held,
            });
        }

        let circulating = self.state.circulating_shares();
        let payouts =
            LiquidityMath::burn_payouts(&self.state.balances, share_amount, circulating)?;
        let now = self.clock.now();

        self.finalize_schedule(now);
        for (balance, payout) in self.state.balances.iter_mut().zip(&payouts) {
            *balance = balance.saturating_sub(*payout);
        }
        if held == share_amount {
            self.state.holdings.remove(&depositor);
        } else {
            self.state.holdings.insert(depositor, held - share_amount);
        }
        self.state.burned += share_amount;

        let transfers = self
            .state
            .asset_ids
            .iter()
            .zip(&payouts)
            .filter(|(_, amount)| **amount > 0)
            .map(|(&asset, &amount)| Transfer {
                asset,
                recipient: depositor,
                amount,
            })
            .collect();

        info!(
            "Burned {} shares for {}, payouts={:?}",
            share_amount, depositor, payouts
        );

        Ok(BurnReceipt {
            depositor,
            burned: share_amount,
            payouts,
            transfers,
        })
    }

    /// Swap `amount_in` of asset `from` for asset `to`
    pub fn swap(
        &mut self,
        depositor: AccountId,
        from: usize,
        to: usize,
        amount_in: u64,
    ) -> Result<SwapReceipt, PoolError> {
        let now = self.clock.now();
        let amount_out = self.quote_swap(from, to, amount_in, now)?;

        let balance_in = self.state.balances[from]
            .checked_add(amount_in)
            .ok_or(PoolError::BalanceOverflow { index: from })?;
        let balance_out = self.state.balances[to].saturating_sub(amount_out);

        self.finalize_schedule(now);
        self.state.balances[from] = balance_in;
        self.state.balances[to] = balance_out;

        if balance_out == 0 {
            warn!(
                "Swap by {} drained asset index {} ({} in at index {})",
                depositor, to, amount_in, from
            );
        }
        debug!(
            "Swap: {} paid {} of index {} for {} of index {}",
            depositor, amount_in, from, amount_out, to
        );

        Ok(SwapReceipt {
            depositor,
            from,
            to,
            amount_in,
            amount_out,
            transfer: Transfer {
                asset: self.state.asset_ids[to],
                recipient: depositor,
                amount: amount_out,
            },
        })
    }

    /// Start moving weights towards `new_weights` over `duration` seconds
    ///
    /// A replacement schedule starts from the weights in effect right now, so
    /// effective weights never jump. The static weights are left alone until
    /// a schedule completes; a zero duration applies the new weights
    /// immediately.
    ///
    /// # Returns
    /// Time at which the new weights are fully in effect.
    pub fn change_weights(
        &mut self,
        duration: u64,
        new_weights: Vec<u64>,
    ) -> Result<u64, PoolError> {
        self.state.require_bootstrapped()?;
        let asset_count = self.state.asset_count();
        let tolerance = self.settings.weight_tolerance;
        validate_weights(&new_weights, asset_count, tolerance)?;

        let now = self.clock.now();
        let end_time = now.saturating_add(duration);
        let in_flight = self
            .state
            .schedule
            .as_ref()
            .is_some_and(|schedule| schedule.is_active() && !schedule.is_complete(now));

        let start_weights = if in_flight {
            let mut snapshot = self.state.effective_weights(now);
            normalize_weights(&mut snapshot);
            validate_weights(&snapshot, asset_count, tolerance)?;
            snapshot
        } else {
            self.state.settled_weights(now)
        };

        info!(
            "Weight change: {:?} -> {:?} over {}s",
            start_weights, new_weights, duration
        );

        self.finalize_schedule(now);
        if duration == 0 {
            self.state.weights = new_weights;
            self.state.schedule = None;
        } else {
            self.state.schedule = Some(WeightSchedule::new(
                now,
                duration,
                start_weights,
                new_weights,
            ));
        }

        Ok(end_time)
    }

    /// Weight of asset `index` right now, following any schedule
    pub fn current_weight(&self, index: usize) -> Option<u64> {
        self.state.effective_weight(index, self.clock.now())
    }

    pub fn balance(&self, index: usize) -> Option<u64> {
        self.state.balances.get(index).copied()
    }

    pub fn total_assets(&self) -> usize {
        self.state.asset_count()
    }

    /// Output a swap would produce right now, `0` if it would fail
    pub fn estimate_swap(&self, from: usize, to: usize, amount_in: u64) -> u64 {
        self.quote_swap(from, to, amount_in, self.clock.now())
            .unwrap_or(0)
    }

    pub fn schedule(&self) -> Option<ScheduleStatus> {
        self.state.schedule_status(self.clock.now())
    }

    /// Seconds until the active schedule completes
    pub fn interpolation_time_left(&self) -> u64 {
        self.schedule().map_or(0, |status| status.time_left)
    }

    pub fn circulating_shares(&self) -> u64 {
        self.state.circulating_shares()
    }

    pub fn shares_of(&self, account: AccountId) -> u64 {
        self.state.shares_of(account)
    }

    pub fn contribution_of(&self, depositor: AccountId) -> Option<&[u64]> {
        self.state.contributions.get(depositor)
    }

    fn pricing_weights(&self, now: u64) -> Vec<u64> {
        match self.settings.swap_weights {
            SwapWeightMode::Live => self.state.effective_weights(now),
            SwapWeightMode::Static => self.state.settled_weights(now),
        }
    }

    fn quote_swap(
        &self,
        from: usize,
        to: usize,
        amount_in: u64,
        now: u64,
    ) -> Result<u64, PoolError> {
        self.state.require_bootstrapped()?;
        self.state.check_index(from)?;
        self.state.check_index(to)?;
        if from == to {
            return Err(PoolError::SameAsset { index: from });
        }
        if amount_in == 0 {
            return Err(PoolError::ZeroAmount);
        }

        let weights = self.pricing_weights(now);
        let leg = SwapLeg {
            balance_in: self.state.balances[from],
            weight_in: weights.get(from).copied().unwrap_or(0),
            balance_out: self.state.balances[to],
            weight_out: weights.get(to).copied().unwrap_or(0),
        };

        if leg.balance_in == 0 {
            return Err(PoolError::ZeroBalance { index: from });
        }
        if leg.balance_out == 0 {
            return Err(PoolError::ZeroBalance { index: to });
        }
        if leg.weight_in == 0 {
            return Err(PoolError::ZeroWeight { index: from });
        }
        if leg.weight_out == 0 {
            return Err(PoolError::ZeroWeight { index: to });
        }

        let amount_out =
            WeightedSwapMath::calculate_output_amount(&leg, amount_in, self.settings.swap_fee)?;
        debug!("Swap quote: {:?} in={} out={}", leg, amount_in, amount_out);
        Ok(amount_out)
    }

    fn finalize_schedule(&mut self, now: u64) {
        if let Some(weights) = self.state.finalize_schedule(now) {
            info!("Weight schedule complete, weights now {:?}", weights);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    const T0: u64 = 1_700_000_000;
    const ALICE: AccountId = AccountId(1);

    fn engine() -> PoolEngine<ManualClock> {
        let mut engine = PoolEngine::with_clock(EngineSettings::default(), ManualClock::new(T0));
        engine
            .bootstrap(
                vec![AssetId::new(10), AssetId::new(20)],
                vec![500_000, 500_000],
            )
            .unwrap();
        engine
    }

    #[test]
    fn test_bootstrap_validation() {
        let mut engine = PoolEngine::with_clock(EngineSettings::default(), ManualClock::new(T0));

        assert_eq!(
            engine.bootstrap(vec![AssetId::new(1)], vec![1_000_000]),
            Err(PoolError::TooFewAssets { count: 1 })
        );
        assert_eq!(
            engine.bootstrap(
                vec![AssetId::new(1), AssetId::new(1)],
                vec![500_000, 500_000]
            ),
            Err(PoolError::DuplicateAsset { asset: 1 })
        );
        assert!(matches!(
            engine.bootstrap(
                vec![AssetId::new(1), AssetId::new(2)],
                vec![500_000, 400_000]
            ),
            Err(PoolError::InvalidWeightSum { .. })
        ));
        assert_eq!(engine.state(), &PoolState::default());

        let token = engine
            .bootstrap(
                vec![AssetId::new(1), AssetId::new(2)],
                vec![500_000, 500_000],
            )
            .unwrap();
        assert_eq!(engine.state().share_token, token);
        assert_eq!(
            engine.bootstrap(
                vec![AssetId::new(3), AssetId::new(4)],
                vec![500_000, 500_000]
            ),
            Err(PoolError::AlreadyBootstrapped)
        );
    }

    #[test]
    fn test_operations_require_bootstrap() {
        let mut engine = PoolEngine::with_clock(EngineSettings::default(), ManualClock::new(T0));

        assert_eq!(
            engine.add_liquidity(ALICE, 0, 1),
            Err(PoolError::NotBootstrapped)
        );
        assert_eq!(
            engine.change_weights(0, vec![500_000, 500_000]),
            Err(PoolError::NotBootstrapped)
        );
        assert_eq!(engine.estimate_swap(0, 1, 100), 0);
        assert_eq!(engine.current_weight(0), None);
        assert_eq!(engine.total_assets(), 0);
    }

    #[test]
    fn test_failed_mint_leaves_state_untouched() {
        let mut engine = engine();
        engine.add_liquidity(ALICE, 0, 1_000_000).unwrap();
        engine.add_liquidity(ALICE, 1, 1_000_000).unwrap();
        engine.get_liquidity(ALICE).unwrap();

        let bob = AccountId::new(2);
        engine.add_liquidity(bob, 0, 500_000).unwrap();
        let before = engine.state().clone();

        assert_eq!(
            engine.get_liquidity(bob),
            Err(PoolError::MissingContribution { index: 1 })
        );
        assert_eq!(engine.state(), &before);
        assert_eq!(engine.contribution_of(bob), Some(&[500_000, 0][..]));
    }

    #[test]
    fn test_swap_rejects_bad_indices() {
        let mut engine = engine();
        engine.add_liquidity(ALICE, 0, 1_000_000).unwrap();
        engine.add_liquidity(ALICE, 1, 1_000_000).unwrap();

        assert_eq!(
            engine.swap(ALICE, 0, 0, 10),
            Err(PoolError::SameAsset { index: 0 })
        );
        assert_eq!(
            engine.swap(ALICE, 0, 5, 10),
            Err(PoolError::InvalidAssetIndex { index: 5, count: 2 })
        );
        assert_eq!(engine.swap(ALICE, 0, 1, 0), Err(PoolError::ZeroAmount));
    }

    #[test]
    fn test_swap_needs_both_balances() {
        let mut engine = engine();
        engine.add_liquidity(ALICE, 0, 1_000_000).unwrap();

        assert_eq!(
            engine.swap(ALICE, 0, 1, 10_000),
            Err(PoolError::ZeroBalance { index: 1 })
        );
        assert_eq!(engine.balance(0), Some(1_000_000));
    }

    #[test]
    fn test_burn_requires_holdings() {
        let mut engine = engine();
        engine.add_liquidity(ALICE, 0, 1_000_000).unwrap();
        engine.add_liquidity(ALICE, 1, 1_000_000).unwrap();
        let minted = engine.get_liquidity(ALICE).unwrap().minted;

        assert_eq!(
            engine.burn_liquidity(AccountId::new(9), 1),
            Err(PoolError::InsufficientShares {
                requested: 1,
                held: 0
            })
        );
        assert_eq!(
            engine.burn_liquidity(ALICE, 0),
            Err(PoolError::ZeroAmount)
        );
        assert_eq!(
            engine.burn_liquidity(ALICE, minted + 1),
            Err(PoolError::InsufficientShares {
                requested: minted + 1,
                held: minted
            })
        );
    }

    #[test]
    fn test_zero_duration_weight_change_is_immediate() {
        let mut engine = engine();
        let end = engine.change_weights(0, vec![300_000, 700_000]).unwrap();

        assert_eq!(end, T0);
        assert_eq!(engine.state().weights, vec![300_000, 700_000]);
        assert!(engine.schedule().is_none());
        assert_eq!(engine.current_weight(1), Some(700_000));
    }

    #[test]
    fn test_execute_dispatches_queries() {
        let mut engine = engine();

        assert_eq!(
            engine.execute(PoolOperation::GetTotalAssets).unwrap(),
            OperationOutcome::TotalAssets { count: 2 }
        );
        assert_eq!(
            engine
                .execute(PoolOperation::GetCurrentWeight { index: 7 })
                .unwrap(),
            OperationOutcome::Weight { weight: None }
        );
        assert_eq!(
            engine
                .execute(PoolOperation::AddLiquidity {
                    depositor: ALICE,
                    index: 1,
                    amount: 42,
                })
                .unwrap(),
            OperationOutcome::LiquidityAdded {
                index: 1,
                balance: 42
            }
        );
    }
}
