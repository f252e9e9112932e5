//! Deterministic fixed-point logarithm, exponential and power
//!
//! Public arguments and results are unsigned integers scaled by [`SCALE`]
//! (`1_000_000` = 1.0). Internally the series run at 18 decimals so that the
//! rounding of each step stays far below one `SCALE` unit; every intermediate
//! is a `u128` and every multiply-divide forms the full product before
//! dividing.
//!
//! Rounding always truncates. For `pow` this means results below 1.0 round
//! towards 1.0 and results above 1.0 round towards 1.0 as well, which is the
//! direction that favours the pool in both swap and mint pricing.

use wamm_types::{MathError, SCALE};

/// Terms of the logarithm series
pub const LN_TERMS: u32 = 10;

/// Terms of the exponential Taylor series, after the leading 1.0
pub const EXP_TERMS: u32 = 10;

const SCALE_WIDE: u128 = SCALE as u128;

/// 1.0 at internal precision (18 decimals)
const ONE: u128 = 1_000_000_000_000_000_000;

/// Internal units per public unit
const WIDEN: u128 = ONE / SCALE_WIDE;

/// ln(2) at internal precision
const LN_2: u128 = 693_147_180_559_945_309;

/// sqrt(2) at internal precision
const SQRT_2: u128 = 1_414_213_562_373_095_048;

/// ln(sqrt(2)) at internal precision
const LN_SQRT_2: u128 = 346_573_590_279_972_654;

/// Largest power of two an exp result may be scaled by without leaving u128
const MAX_EXP_SHIFT: u128 = 66;

/// `a * b / c` on u64 operands through a u128 intermediate
#[inline]
pub fn mul_div(a: u64, b: u64, c: u64) -> Result<u64, MathError> {
    let wide = mul_div_wide(a as u128, b as u128, c as u128)?;
    u64::try_from(wide).map_err(|_| MathError::Overflow)
}

/// `a * b / c` on u128 operands, failing if the product does not fit
#[inline]
pub fn mul_div_wide(a: u128, b: u128, c: u128) -> Result<u128, MathError> {
    if c == 0 {
        return Err(MathError::DivisionByZero);
    }
    a.checked_mul(b)
        .map(|product| product / c)
        .ok_or(MathError::Overflow)
}

/// Natural logarithm of a `SCALE`-scaled value
///
/// Returns `(negative, magnitude)`: values below 1.0 have a negative
/// logarithm, computed as the logarithm of the reciprocal.
///
/// # Errors
/// [`MathError::LogOfZero`] when `x == 0`.
pub fn ln(x: u64) -> Result<(bool, u64), MathError> {
    let (negative, magnitude) = ln_internal(x)?;
    // Magnitude is at most ln(SCALE^2) at internal precision, well within u64 after narrowing
    Ok((negative, (magnitude / WIDEN) as u64))
}

/// e raised to a non-negative `SCALE`-scaled exponent
///
/// # Errors
/// [`MathError::Overflow`] when the result does not fit in a u64.
pub fn exp(x: u64) -> Result<u64, MathError> {
    let result = exp_internal(x as u128 * WIDEN)? / WIDEN;
    u64::try_from(result).map_err(|_| MathError::Overflow)
}

/// `x ^ y` for `SCALE`-scaled `x` and `y`, computed as `exp(y * ln(x))`
///
/// `pow(0, y)` is `0`. For `x < 1.0` the result is the reciprocal of
/// `exp(y * |ln(x)|)`, which underflows to `0` once the exponent is too large
/// to represent.
///
/// # Errors
/// [`MathError::Overflow`] when `x > 1.0` and the result does not fit in a u128.
pub fn pow(x: u64, y: u64) -> Result<u128, MathError> {
    if x == 0 {
        return Ok(0);
    }

    let (negative, ln_x) = ln_internal(x)?;
    let exponent = mul_div_wide(y as u128, ln_x, SCALE_WIDE)?;

    match exp_internal(exponent) {
        Ok(e) if negative => mul_div_wide(ONE, SCALE_WIDE, e),
        Ok(e) => Ok(e / WIDEN),
        Err(MathError::Overflow) if negative => Ok(0),
        Err(err) => Err(err),
    }
}

/// Signed logarithm at internal precision
fn ln_internal(x: u64) -> Result<(bool, u128), MathError> {
    if x == 0 {
        return Err(MathError::LogOfZero);
    }

    let value = x as u128 * WIDEN;
    if x < SCALE {
        // ONE^2 fits comfortably: 1e36 < 2^128
        let reciprocal = ONE * ONE / value;
        Ok((true, ln_at_least_one(reciprocal)))
    } else {
        Ok((false, ln_at_least_one(value)))
    }
}

/// ln(x) for x >= 1.0 at internal precision
///
/// Range-reduces x into [1, sqrt(2)) so that z = (x - 1) / x stays below
/// 0.293 and ten terms of sum(z^k / k) converge well past public precision.
fn ln_at_least_one(mut x: u128) -> u128 {
    debug_assert!(x >= ONE);

    let mut result = 0u128;

    while x >= 2 * ONE {
        x >>= 1;
        result += LN_2;
    }

    if x >= SQRT_2 {
        x = x * ONE / SQRT_2;
        result += LN_SQRT_2;
    }

    let z = (x - ONE) * ONE / x;
    let mut term = z;
    let mut series = z;

    for k in 2..=LN_TERMS as u128 {
        term = term * z / ONE;
        series += term / k;
    }

    result + series
}

/// e^x for x >= 0 at internal precision
///
/// Splits x = n * ln(2) + r with r in [0, ln 2), sums the Taylor series of
/// e^r and scales by 2^n.
fn exp_internal(x: u128) -> Result<u128, MathError> {
    let n = x / LN_2;
    if n > MAX_EXP_SHIFT {
        return Err(MathError::Overflow);
    }
    let r = x - n * LN_2;

    let mut term = ONE;
    let mut sum = ONE;
    for k in 1..=EXP_TERMS as u128 {
        term = term * r / (k * ONE);
        sum += term;
    }

    // sum < 2 * ONE < 2^61, so shifting by at most 66 stays below 2^127
    Ok(sum << n)
}
