//! Fixed-point fractions with 6 decimal places
//!
//! Weights, ratios, logarithms and powers inside the pool engine are unsigned
//! integers scaled by [`SCALE`]. This module provides the scale constant and a
//! thin [`Fixed`] wrapper used at the boundaries (configuration files, tests,
//! logging) where values are written as human-readable decimals.
//!
//! Examples:
//! - 1.0 = Fixed(1_000_000)
//! - 0.5 = Fixed(500_000)
//! - 0.001 = Fixed(1_000)

use crate::common::errors::FixedPointError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed-point unit: `1_000_000` represents `1.0`
pub const SCALE: u64 = 1_000_000;

/// Unsigned fixed-point value scaled by [`SCALE`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fixed(pub u64);

impl Fixed {
    /// Number of decimal places carried by the scale
    pub const DECIMALS: u32 = 6;

    /// 1.0
    pub const ONE: Self = Self(SCALE);

    /// Create from a decimal string with exact parsing
    ///
    /// Digits beyond the sixth decimal place are truncated.
    ///
    /// # Examples
    /// ```
    /// use wamm_types::Fixed;
    ///
    /// let weight = Fixed::from_decimal_str("0.8").unwrap();
    /// assert_eq!(weight.raw(), 800_000);
    /// ```
    pub fn from_decimal_str(s: &str) -> Result<Self, FixedPointError> {
        let decimal = Decimal::from_str(s.trim()).map_err(|_| FixedPointError::InvalidDecimal {
            input: s.to_string(),
        })?;
        Self::from_decimal(decimal)
    }

    /// Convert a decimal into fixed point, truncating extra precision
    pub fn from_decimal(decimal: Decimal) -> Result<Self, FixedPointError> {
        if decimal.is_sign_negative() && !decimal.is_zero() {
            return Err(FixedPointError::Underflow {
                input: decimal.to_string(),
            });
        }

        let scaled = decimal
            .checked_mul(Decimal::from(SCALE))
            .ok_or_else(|| FixedPointError::Overflow {
                input: decimal.to_string(),
            })?;

        scaled
            .trunc()
            .to_u64()
            .map(Self)
            .ok_or_else(|| FixedPointError::Overflow {
                input: decimal.to_string(),
            })
    }

    /// Exact decimal representation, for display and reference calculations
    pub fn to_decimal(self) -> Decimal {
        Decimal::from_i128_with_scale(self.0 as i128, Self::DECIMALS)
    }

    /// Get the raw scaled integer value
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

impl FromStr for Fixed {
    type Err = FixedPointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_decimal_str(s)
    }
}

/// Parse a list of decimal weights such as `["0.8", "0.2"]` into raw scaled values
pub fn weights_from_decimals(weights: &[&str]) -> Result<Vec<u64>, FixedPointError> {
    weights
        .iter()
        .map(|w| Fixed::from_decimal_str(w).map(Fixed::raw))
        .collect()
}
