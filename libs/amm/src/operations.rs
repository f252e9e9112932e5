//! Operation requests and their outcomes
//!
//! [`PoolOperation`] is the serialisable form of every call the engine
//! accepts, so requests can arrive as JSON/TOML and be dispatched through
//! [`crate::engine::PoolEngine::execute`].

use crate::weights::ScheduleStatus;
use serde::{Deserialize, Serialize};
use wamm_types::{AccountId, AssetId};

/// A request against one pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PoolOperation {
    Bootstrap {
        asset_ids: Vec<AssetId>,
        weights: Vec<u64>,
    },
    AddLiquidity {
        depositor: AccountId,
        index: usize,
        amount: u64,
    },
    GetLiquidity {
        depositor: AccountId,
    },
    BurnLiquidity {
        depositor: AccountId,
        share_amount: u64,
    },
    Swap {
        depositor: AccountId,
        from: usize,
        to: usize,
        amount_in: u64,
    },
    ChangeWeights {
        duration: u64,
        weights: Vec<u64>,
    },
    GetCurrentWeight {
        index: usize,
    },
    GetBalance {
        index: usize,
    },
    GetTotalAssets,
    EstimateSwap {
        from: usize,
        to: usize,
        amount_in: u64,
    },
    GetSchedule,
}

impl PoolOperation {
    /// Operation leaves pool state untouched
    pub fn is_read_only(&self) -> bool {
        matches!(
            self,
            PoolOperation::GetCurrentWeight { .. }
                | PoolOperation::GetBalance { .. }
                | PoolOperation::GetTotalAssets
                | PoolOperation::EstimateSwap { .. }
                | PoolOperation::GetSchedule
        )
    }
}

/// Asset leaving the pool towards an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub asset: AssetId,
    pub recipient: AccountId,
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintReceipt {
    pub depositor: AccountId,
    pub minted: u64,
    pub transfer: Transfer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurnReceipt {
    pub depositor: AccountId,
    pub burned: u64,
    /// Payout per asset index, zero entries included
    pub payouts: Vec<u64>,
    /// One transfer per non-zero payout
    pub transfers: Vec<Transfer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapReceipt {
    pub depositor: AccountId,
    pub from: usize,
    pub to: usize,
    pub amount_in: u64,
    pub amount_out: u64,
    pub transfer: Transfer,
}

/// Result of [`PoolOperation`] dispatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum OperationOutcome {
    Bootstrapped { share_token: AssetId },
    LiquidityAdded { index: usize, balance: u64 },
    Minted(MintReceipt),
    Burned(BurnReceipt),
    Swapped(SwapReceipt),
    WeightsScheduled { end_time: u64 },
    Weight { weight: Option<u64> },
    Balance { balance: Option<u64> },
    TotalAssets { count: usize },
    Estimate { amount_out: u64 },
    Schedule { status: Option<ScheduleStatus> },
}
