//! Bounded exponential and natural logarithm on WAD values
//!
//! Both series run at 36 decimals of internal precision and round back to
//! WAD once, so the result is within one unit of the true value.

use solana_program::program_error::ProgramError;

use crate::{
    constants::{MAX_EXP_INPUT_WAD, WAD},
    error::ClmsrError,
    math::fixed_point::{mul_div, Rounding},
};

/// Internal precision (10^36)
const SCALE_36: u128 = WAD * WAD;

/// ln(2) at 36 decimals
const LN2_36: u128 = 693_147_180_559_945_309_417_232_121_458_176_568;

/// Upper bound on series terms; both series converge well before this
const MAX_SERIES_TERMS: u128 = 96;

/// e^x for `0 <= x <= MAX_EXP_INPUT_WAD`, rounded down
pub fn exp(x: u128) -> Result<u128, ProgramError> {
    if x > MAX_EXP_INPUT_WAD {
        return Err(ClmsrError::InputOutOfRange.into());
    }
    if x == 0 {
        return Ok(WAD);
    }

    // x = k * ln2 + r with 0 <= r < ln2
    let x_36 = x * WAD;
    let k = x_36 / LN2_36;
    let r = x_36 - k * LN2_36;

    // Taylor series for e^r
    let mut term = SCALE_36;
    let mut sum = SCALE_36;
    let mut n = 1u128;
    while n <= MAX_SERIES_TERMS {
        term = mul_div(term, r, SCALE_36, Rounding::Down)? / n;
        if term == 0 {
            break;
        }
        sum += term;
        n += 1;
    }

    // k <= 66 for the allowed domain
    mul_div(sum, 1u128 << k, WAD, Rounding::Down)
}

/// e^-x as a WAD value, rounded down
pub fn exp_neg(x: u128) -> Result<u128, ProgramError> {
    let positive = exp(x)?;
    mul_div(WAD, WAD, positive, Rounding::Down)
}

/// Natural logarithm of a WAD value, rounded to nearest.
///
/// Inputs below 1.0 give a negative result. Zero is rejected.
pub fn ln(x: u128) -> Result<i128, ProgramError> {
    if x == 0 {
        return Err(ClmsrError::InvalidParameter.into());
    }

    if x >= WAD {
        // floor(log2(x / WAD)) equals floor(log2(floor(x / WAD)))
        let whole = x / WAD;
        let k = 127 - whole.leading_zeros();
        let y_36 = mul_div(x, WAD, 1u128 << k, Rounding::Down)?;
        let ln_36 = (k as u128) * LN2_36 + ln_unit_interval_36(y_36)?;
        Ok(round_36_to_wad(ln_36) as i128)
    } else {
        // Shift left until the value lands in [1, 2)
        let mut shift = x.leading_zeros() - WAD.leading_zeros();
        if (x << shift) < WAD {
            shift += 1;
        }
        let y_36 = (x << shift) * WAD;
        let ln_y_36 = ln_unit_interval_36(y_36)?;
        let ln_36 = (shift as u128) * LN2_36 - ln_y_36;
        Ok(-(round_36_to_wad(ln_36) as i128))
    }
}

/// ln for arguments known to be at least 1.0, as an unsigned WAD value
pub fn ln_unsigned(x: u128) -> Result<u128, ProgramError> {
    if x < WAD {
        return Err(ClmsrError::InvalidParameter.into());
    }
    let value = ln(x)?;
    Ok(value as u128)
}

/// e^(numerator / denominator)
pub fn safe_exp(numerator: u128, denominator: u128) -> Result<u128, ProgramError> {
    exp(bounded_exponent(numerator, denominator)?)
}

/// e^-(numerator / denominator), with the same domain as [`safe_exp`]
pub fn safe_exp_neg(numerator: u128, denominator: u128) -> Result<u128, ProgramError> {
    exp_neg(bounded_exponent(numerator, denominator)?)
}

fn bounded_exponent(numerator: u128, denominator: u128) -> Result<u128, ProgramError> {
    if denominator == 0 {
        return Err(ClmsrError::InvalidParameter.into());
    }

    // A quotient too wide for u128 is far past the exponential bound
    let exponent = mul_div(numerator, WAD, denominator, Rounding::Down)
        .map_err(|_| ProgramError::from(ClmsrError::InputOutOfRange))?;
    if exponent > MAX_EXP_INPUT_WAD {
        return Err(ClmsrError::InputOutOfRange.into());
    }
    Ok(exponent)
}

/// ln(y) for y in [1, 2) at 36 decimals, via 2 * atanh((y - 1) / (y + 1))
fn ln_unit_interval_36(y_36: u128) -> Result<u128, ProgramError> {
    debug_assert!(y_36 >= SCALE_36 && y_36 < 2 * SCALE_36);

    let z = mul_div(y_36 - SCALE_36, SCALE_36, y_36 + SCALE_36, Rounding::Down)?;
    let z_squared = mul_div(z, z, SCALE_36, Rounding::Down)?;

    let mut term = z;
    let mut sum = z;
    let mut denominator = 3u128;
    while denominator <= 2 * MAX_SERIES_TERMS {
        term = mul_div(term, z_squared, SCALE_36, Rounding::Down)?;
        if term == 0 {
            break;
        }
        sum += term / denominator;
        denominator += 2;
    }

    Ok(2 * sum)
}

fn round_36_to_wad(value_36: u128) -> u128 {
    (value_36 + WAD / 2) / WAD
}
