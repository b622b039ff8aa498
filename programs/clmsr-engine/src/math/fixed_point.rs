//! WAD fixed-point arithmetic
//!
//! Values are u128 scaled by 10^18. Every product goes through a 256-bit
//! intermediate so nothing wraps; a result wider than 128 bits is reported
//! as `ArithmeticOverflow`.

use solana_program::program_error::ProgramError;

use crate::{
    constants::WAD,
    error::ClmsrError,
    math::u256::U256,
};

/// Rounding direction for a scaled operation.
///
/// Amounts owed by a user round `Up`, amounts owed to a user round `Down`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    Down,
    Up,
    Nearest,
}

/// Compute `a * b / denominator` with the requested rounding
pub fn mul_div(
    a: u128,
    b: u128,
    denominator: u128,
    rounding: Rounding,
) -> Result<u128, ProgramError> {
    if denominator == 0 {
        return Err(ClmsrError::InvalidParameter.into());
    }

    let (quotient, remainder) = U256::full_mul(a, b)
        .div_rem_u128(denominator)
        .ok_or(ClmsrError::ArithmeticOverflow)?;

    let round_up = match rounding {
        Rounding::Down => false,
        Rounding::Up => remainder > 0,
        Rounding::Nearest => remainder >= denominator - remainder,
    };

    if round_up {
        quotient
            .checked_add(1)
            .ok_or_else(|| ClmsrError::ArithmeticOverflow.into())
    } else {
        Ok(quotient)
    }
}

/// `a * b`, rounded down
pub fn mul(a: u128, b: u128) -> Result<u128, ProgramError> {
    mul_div(a, b, WAD, Rounding::Down)
}

/// `a * b`, rounded half up
pub fn mul_nearest(a: u128, b: u128) -> Result<u128, ProgramError> {
    mul_div(a, b, WAD, Rounding::Nearest)
}

/// `a / b`, rounded down
pub fn div_floor(a: u128, b: u128) -> Result<u128, ProgramError> {
    mul_div(a, WAD, b, Rounding::Down)
}

/// `a / b`, rounded up
pub fn div_ceil(a: u128, b: u128) -> Result<u128, ProgramError> {
    mul_div(a, WAD, b, Rounding::Up)
}

/// `a / b`, rounded half up
pub fn div_nearest(a: u128, b: u128) -> Result<u128, ProgramError> {
    mul_div(a, WAD, b, Rounding::Nearest)
}

pub fn checked_add(a: u128, b: u128) -> Result<u128, ProgramError> {
    a.checked_add(b)
        .ok_or_else(|| ClmsrError::ArithmeticOverflow.into())
}

pub fn checked_sub(a: u128, b: u128) -> Result<u128, ProgramError> {
    a.checked_sub(b)
        .ok_or_else(|| ClmsrError::ArithmeticOverflow.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mul_rounds_down() {
        assert_eq!(mul(2 * WAD, 3 * WAD).unwrap(), 6 * WAD);
        // 1.5e-18 * 1.0 truncates
        assert_eq!(mul(3, WAD / 2).unwrap(), 1);
        assert_eq!(mul_div(3, WAD / 2, WAD, Rounding::Up).unwrap(), 2);
        assert_eq!(mul_nearest(3, WAD / 2).unwrap(), 2);
        assert_eq!(mul_nearest(1, WAD / 3).unwrap(), 0);
    }

    #[test]
    fn test_division_directions() {
        assert_eq!(div_floor(WAD, 3 * WAD).unwrap(), 333_333_333_333_333_333);
        assert_eq!(div_ceil(WAD, 3 * WAD).unwrap(), 333_333_333_333_333_334);
        assert_eq!(div_nearest(2 * WAD, 3 * WAD).unwrap(), 666_666_666_666_666_667);
        assert_eq!(div_floor(6 * WAD, 2 * WAD).unwrap(), 3 * WAD);
        assert_eq!(div_ceil(6 * WAD, 2 * WAD).unwrap(), 3 * WAD);
    }

    #[test]
    fn test_zero_denominator_is_invalid_parameter() {
        let err = div_floor(WAD, 0).unwrap_err();
        assert_eq!(err, ClmsrError::InvalidParameter.into());
        assert!(div_ceil(WAD, 0).is_err());
    }

    #[test]
    fn test_wide_intermediate_does_not_overflow() {
        // 10^12 * 10^8 in WAD: the raw product needs ~167 bits
        let a = 1_000_000_000_000 * WAD;
        let b = 100_000_000 * WAD;
        assert_eq!(mul(a, b).unwrap(), 100_000_000_000_000_000_000 * WAD);
    }

    #[test]
    fn test_overflowing_result_is_reported() {
        let err = mul(u128::MAX, 2 * WAD).unwrap_err();
        assert_eq!(err, ClmsrError::ArithmeticOverflow.into());
        assert!(checked_add(u128::MAX, 1).is_err());
        assert!(checked_sub(0, 1).is_err());
    }
}
