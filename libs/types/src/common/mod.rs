//! Common types shared by every pool crate

pub mod errors;
pub mod fixed_point;
pub mod identifiers;

pub use errors::{FixedPointError, MathError, PoolError};
pub use fixed_point::{weights_from_decimals, Fixed, SCALE};
pub use identifiers::{AccountId, AssetId, PoolId, PoolKey};
