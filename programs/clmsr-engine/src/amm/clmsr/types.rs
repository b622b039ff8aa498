//! CLMSR pricing types

use solana_program::program_error::ProgramError;

use crate::{
    constants::{MAX_FACTOR, MIN_FACTOR},
    math::{safe_exp, safe_exp_neg},
    state::DistributionTree,
};

use super::validation::{validate_liquidity_parameter, validate_trade_range};

/// Direction of a trade against the distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    /// Range factor for `quantity` shares: e^(q/α) on buys, e^(-q/α) on sells.
    ///
    /// The exponential is rounded, so e^ln(100) can land a few units past the
    /// tree's factor bounds; the result is clamped back inside them.
    pub fn range_factor(self, quantity: u128, alpha: u128) -> Result<u128, ProgramError> {
        match self {
            TradeSide::Buy => Ok(safe_exp(quantity, alpha)?.min(MAX_FACTOR)),
            TradeSide::Sell => Ok(safe_exp_neg(quantity, alpha)?.max(MIN_FACTOR)),
        }
    }
}

/// Validated parameters a single cost or proceeds computation works against.
///
/// Sums are read from the tree per chunk, never cached here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingContext {
    /// Liquidity parameter α
    pub alpha: u128,
    pub lo: u32,
    pub hi: u32,
}

impl PricingContext {
    pub fn load(
        tree: &DistributionTree,
        alpha: u128,
        lo: u32,
        hi: u32,
    ) -> Result<Self, ProgramError> {
        validate_liquidity_parameter(alpha)?;
        validate_trade_range(tree, lo, hi)?;

        Ok(Self { alpha, lo, hi })
    }
}
