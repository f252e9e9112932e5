//! # Weighted AMM Pool Engine
//!
//! ## Purpose
//!
//! Deterministic engine for a weighted multi-asset automated market maker.
//! Prices swaps between N assets held in one reserve, mints and burns a pool
//! share token against contributions, and moves weights gradually along a
//! time-bounded schedule.
//!
//! ## Components
//!
//! - [`math`]: integer-only `ln`, `exp`, `pow` and `mul_div` at `SCALE` precision
//! - [`swap`]: weighted constant-mean output calculation
//! - [`liquidity`]: share mint/burn math and the per-depositor contribution ledger
//! - [`weights`]: weight validation and linear weight schedules
//! - [`pool`]: the serialisable pool state
//! - [`engine`]: [`PoolEngine`], the all-or-nothing operation executor
//! - [`operations`]: the [`PoolOperation`] request enum and its outcomes
//! - [`registry`]: pool lookup keyed by a hash of the pool definition
//!
//! ## Rounding
//!
//! Every intermediate is an unsigned integer and every division truncates.
//! Truncation in `pow` rounds towards 1.0, so a share mint never rounds up
//! and a swap output only rounds in the swapper's favour through the
//! `SCALE`-precision balance ratio.
//!
//! ## Example
//!
//! ```rust
//! use wamm_amm::{ManualClock, PoolEngine};
//! use wamm_config::EngineSettings;
//! use wamm_types::{AccountId, AssetId};
//!
//! let mut engine = PoolEngine::with_clock(EngineSettings::default(), ManualClock::new(1_000));
//! engine.bootstrap(vec![AssetId::new(1), AssetId::new(2)], vec![500_000, 500_000])?;
//!
//! let alice = AccountId::new(7);
//! engine.add_liquidity(alice, 0, 10_000_000)?;
//! engine.add_liquidity(alice, 1, 10_000_000)?;
//! assert_eq!(engine.get_liquidity(alice)?.minted, 1_000_000_000);
//!
//! let out = engine.swap(alice, 0, 1, 10_000)?.amount_out;
//! assert!(out > 0 && out < 10_000);
//! # Ok::<(), wamm_types::PoolError>(())
//! ```

pub mod clock;
pub mod engine;
pub mod liquidity;
pub mod math;
pub mod operations;
pub mod pool;
pub mod registry;
pub mod swap;
pub mod weights;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::PoolEngine;
pub use liquidity::{ContributionBook, LiquidityMath};
pub use math::{exp, ln, mul_div, pow, EXP_TERMS, LN_TERMS};
pub use operations::{
    BurnReceipt, MintReceipt, OperationOutcome, PoolOperation, SwapReceipt, Transfer,
};
pub use pool::PoolState;
pub use registry::{pool_key, InMemoryPoolRegistry, PoolRegistry};
pub use swap::{calc_out, SwapLeg, WeightedSwapMath};
pub use weights::{ScheduleStatus, WeightSchedule};
