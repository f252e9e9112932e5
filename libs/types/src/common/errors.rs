//! Error types for fixed-point arithmetic and pool operations
//!
//! Every pool operation is all-or-nothing: returning one of these errors means
//! the operation left the pool state exactly as it found it.

use thiserror::Error;

/// Errors raised by the deterministic fixed-point math kernels
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    /// Natural logarithm requested for a non-positive argument
    #[error("Logarithm undefined for x <= 0")]
    LogOfZero,

    /// Divisor of a multiply-divide step was zero
    #[error("Division by zero in fixed-point arithmetic")]
    DivisionByZero,

    /// Result does not fit the intermediate or output width
    #[error("Overflow in fixed-point arithmetic")]
    Overflow,
}

/// Errors that can occur while parsing or converting fixed-point values
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FixedPointError {
    /// Invalid decimal string format
    #[error("Invalid decimal string: '{input}' - expected numeric format")]
    InvalidDecimal { input: String },

    /// Value exceeds the maximum representable value for the type
    #[error("Overflow: value {input} exceeds maximum representable value")]
    Overflow { input: String },

    /// Negative values are not representable
    #[error("Underflow: value {input} is negative")]
    Underflow { input: String },
}

/// Errors raised by pool operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("Pool has already been bootstrapped")]
    AlreadyBootstrapped,

    #[error("Pool has not been bootstrapped")]
    NotBootstrapped,

    #[error("At least 2 assets required, got {count}")]
    TooFewAssets { count: usize },

    #[error("Length mismatch: expected {expected} entries, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Asset {asset} appears more than once")]
    DuplicateAsset { asset: u64 },

    #[error("Weight at index {index} is zero")]
    ZeroWeight { index: usize },

    /// Weights must sum to SCALE within the configured tolerance
    #[error("Weights sum to {sum}, expected {expected} (tolerance {tolerance})")]
    InvalidWeightSum {
        sum: u64,
        expected: u64,
        tolerance: u64,
    },

    #[error("Asset index {index} out of range for {count} assets")]
    InvalidAssetIndex { index: usize, count: usize },

    #[error("Cannot swap asset index {index} for itself")]
    SameAsset { index: usize },

    #[error("Amount must be greater than zero")]
    ZeroAmount,

    /// A ratio needs this balance as a divisor
    #[error("Pool balance of asset index {index} is zero")]
    ZeroBalance { index: usize },

    #[error("Depositor has no contribution for asset index {index}")]
    MissingContribution { index: usize },

    #[error("Depositor has nothing to mint")]
    NoContribution,

    #[error("Insufficient shares: requested {requested}, held {held}")]
    InsufficientShares { requested: u64, held: u64 },

    #[error("Share reserve exhausted: requested {requested}, reserve {reserve}")]
    InsufficientShareReserve { requested: u64, reserve: u64 },

    #[error("Balance overflow on asset index {index}")]
    BalanceOverflow { index: usize },

    #[error("Pool {key} already registered")]
    PoolAlreadyExists { key: String },

    #[error(transparent)]
    Math(#[from] MathError),
}
