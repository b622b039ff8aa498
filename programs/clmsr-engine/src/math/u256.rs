//! 256-bit unsigned integer for WAD intermediates
//!
//! Only the operations the fixed-point kernel needs: a full 128x128 product
//! and long division by a 128-bit divisor.

/// 256-bit unsigned integer represented as two u128 values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct U256 {
    /// Low 128 bits
    pub lo: u128,
    /// High 128 bits
    pub hi: u128,
}

impl U256 {
    pub const fn from_u128(val: u128) -> Self {
        Self { lo: val, hi: 0 }
    }

    /// Full product of two u128 values, never overflows
    pub fn full_mul(a: u128, b: u128) -> Self {
        const MASK: u128 = u64::MAX as u128;

        let a0 = a & MASK;
        let a1 = a >> 64;
        let b0 = b & MASK;
        let b1 = b >> 64;

        let p00 = a0 * b0;
        let p01 = a0 * b1;
        let p10 = a1 * b0;
        let p11 = a1 * b1;

        // Each addend is below 2^64, so the middle column stays below 2^66
        let mid = (p00 >> 64) + (p01 & MASK) + (p10 & MASK);

        Self {
            lo: (p00 & MASK) | (mid << 64),
            hi: p11 + (p01 >> 64) + (p10 >> 64) + (mid >> 64),
        }
    }

    /// Divide by a u128, returning (quotient, remainder).
    ///
    /// Returns `None` for a zero divisor or when the quotient needs more than
    /// 128 bits.
    pub fn div_rem_u128(&self, divisor: u128) -> Option<(u128, u128)> {
        if divisor == 0 || self.hi >= divisor {
            return None;
        }
        if self.hi == 0 {
            return Some((self.lo / divisor, self.lo % divisor));
        }

        // Shift-subtract long division over the low word; the running
        // remainder starts below the divisor because hi < divisor.
        let mut remainder = self.hi;
        let mut quotient = 0u128;
        for bit in (0..128).rev() {
            let carry = remainder >> 127;
            remainder = (remainder << 1) | ((self.lo >> bit) & 1);
            quotient <<= 1;
            if carry == 1 || remainder >= divisor {
                remainder = remainder.wrapping_sub(divisor);
                quotient |= 1;
            }
        }

        Some((quotient, remainder))
    }
}
