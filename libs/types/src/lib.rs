//! # Weighted AMM Types Library
//!
//! Shared type system for the weighted multi-asset pool engine.
//!
//! ## Design Philosophy
//!
//! - **No Floating Point**: weights, ratios and powers are `u64` values scaled by [`SCALE`]
//! - **Type Safety**: asset, account and pool identifiers are distinct types
//! - **Clear Boundaries**: decimal strings are converted once, at the edges, via [`Fixed`]
//! - **One Error Vocabulary**: every pool operation fails with a [`PoolError`]
//!
//! ## Quick Start
//!
//! ```rust
//! use wamm_types::{AssetId, Fixed, SCALE};
//!
//! let weight = Fixed::from_decimal_str("0.25").unwrap();
//! assert_eq!(weight.raw() * 4, SCALE);
//!
//! let usdc = AssetId::new(31566704);
//! assert_eq!(usdc.inner(), 31566704);
//! ```

pub mod common;

pub use common::errors::{FixedPointError, MathError, PoolError};
pub use common::fixed_point::{weights_from_decimals, Fixed, SCALE};
pub use common::identifiers::{AccountId, AssetId, PoolId, PoolKey};
