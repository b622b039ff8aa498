//! CLMSR pricing over the distribution tree
//!
//! Buying q shares of [lo, hi] scales those bins by e^(q/α) and costs
//! α·ln(Σ_after/Σ_before). Selling scales by e^(-q/α) and pays
//! α·ln(Σ_before/Σ_after). Trades larger than the safe chunk size are split
//! into sequential chunks, each applied to the tree before the next is sized.

use solana_program::{msg, program_error::ProgramError};

use crate::{
    constants::{
        CHUNK_SHRINK_DIVISOR, CHUNK_SHRINK_SUM_MULTIPLE, LN_100_WAD, MAX_CHUNKS_PER_TX, WAD,
    },
    error::ClmsrError,
    math::{checked_add, checked_sub, div_ceil, div_floor, ln_unsigned, mul, safe_exp},
    state::DistributionTree,
};

use super::{
    types::{PricingContext, TradeSide},
    validation::{validate_liquidity_parameter, validate_trade_range},
};

/// Largest quantity one chunk may carry for liquidity parameter `alpha`.
///
/// α·ln(100) keeps the chunk's range factor inside the tree's [0.01, 100]
/// window. ln(100) is far below the exponential domain bound, so this is
/// the binding limit for every α.
pub fn max_safe_chunk_quantity(alpha: u128) -> Result<u128, ProgramError> {
    validate_liquidity_parameter(alpha)?;
    mul(alpha, LN_100_WAD)
}

/// Apply a buy of `quantity` over `[lo, hi]` to the tree and return its cost.
///
/// A chunked trade applies each chunk before sizing the next. If it fails
/// part way, the chunks already applied stay in the tree: callers restore
/// their own copy on error or price against a clone as `quote_trade_cost` does.
pub fn calculate_trade_cost(
    tree: &mut DistributionTree,
    alpha: u128,
    lo: u32,
    hi: u32,
    quantity: u128,
) -> Result<u128, ProgramError> {
    execute_trade(tree, alpha, lo, hi, quantity, TradeSide::Buy)
}

/// Apply a sell of `quantity` over `[lo, hi]` to the tree and return its proceeds.
///
/// Shares the partial-application caveat of [`calculate_trade_cost`].
pub fn calculate_sell_proceeds(
    tree: &mut DistributionTree,
    alpha: u128,
    lo: u32,
    hi: u32,
    quantity: u128,
) -> Result<u128, ProgramError> {
    execute_trade(tree, alpha, lo, hi, quantity, TradeSide::Sell)
}

/// Cost of a buy without touching the caller's tree
pub fn quote_trade_cost(
    tree: &DistributionTree,
    alpha: u128,
    lo: u32,
    hi: u32,
    quantity: u128,
) -> Result<u128, ProgramError> {
    let mut scratch = tree.clone();
    calculate_trade_cost(&mut scratch, alpha, lo, hi, quantity)
}

/// Proceeds of a sell without touching the caller's tree
pub fn quote_sell_proceeds(
    tree: &DistributionTree,
    alpha: u128,
    lo: u32,
    hi: u32,
    quantity: u128,
) -> Result<u128, ProgramError> {
    let mut scratch = tree.clone();
    calculate_sell_proceeds(&mut scratch, alpha, lo, hi, quantity)
}

/// Marginal price of `[lo, hi]`: its share of the total weight
pub fn range_price(tree: &mut DistributionTree, lo: u32, hi: u32) -> Result<u128, ProgramError> {
    validate_trade_range(tree, lo, hi)?;
    tree.range_probability(lo, hi)
}

/// Quantity a buy of `[lo, hi]` obtains for exactly `cost`.
///
/// Quoting only: pending factors may be pushed down while reading the range
/// sum, but no bin weight changes.
pub fn calculate_quantity_from_cost(
    tree: &mut DistributionTree,
    alpha: u128,
    lo: u32,
    hi: u32,
    cost: u128,
) -> Result<u128, ProgramError> {
    PricingContext::load(tree, alpha, lo, hi)?;
    if cost == 0 {
        return Ok(0);
    }

    let affected = tree.get_range_sum(lo, hi)?;
    if affected == 0 {
        return Err(ClmsrError::AffectedSumZero.into());
    }
    // Read after the range: the query re-aggregates the root
    let total_sum = tree.total_sum()?;

    // Σ_after = Σ_before · e^(cost/α); everything outside the range is unchanged
    let growth = safe_exp(cost, alpha)?;
    let new_total = mul(total_sum, growth)?;
    let untouched = checked_sub(total_sum, affected)?;
    let required_affected = checked_sub(new_total, untouched)?;

    let ratio = div_floor(required_affected, affected)?;
    if ratio <= WAD {
        return Ok(0);
    }
    mul(alpha, ln_unsigned(ratio)?)
}

fn execute_trade(
    tree: &mut DistributionTree,
    alpha: u128,
    lo: u32,
    hi: u32,
    quantity: u128,
    side: TradeSide,
) -> Result<u128, ProgramError> {
    let ctx = PricingContext::load(tree, alpha, lo, hi)?;
    if quantity == 0 {
        return Ok(0);
    }

    if quantity <= max_safe_chunk_quantity(alpha)? {
        if let Some(amount) = apply_chunk(tree, &ctx, quantity, side)? {
            return Ok(amount);
        }
        // The affected product would overflow in one step; the chunked path
        // shrinks chunks as the range grows.
    }

    execute_chunked(tree, &ctx, quantity, side)
}

/// Split `quantity` into at most `MAX_CHUNKS_PER_TX` safe chunks
fn execute_chunked(
    tree: &mut DistributionTree,
    ctx: &PricingContext,
    quantity: u128,
    side: TradeSide,
) -> Result<u128, ProgramError> {
    let max_chunk = max_safe_chunk_quantity(ctx.alpha)?;
    let shrunk_chunk = ctx.alpha / CHUNK_SHRINK_DIVISOR;
    let shrink_above = ctx.alpha.saturating_mul(CHUNK_SHRINK_SUM_MULTIPLE);

    let mut remaining = quantity;
    let mut total = 0u128;
    let mut chunks = 0u32;

    while remaining > 0 && chunks < MAX_CHUNKS_PER_TX {
        let affected = tree.get_range_sum(ctx.lo, ctx.hi)?;

        let mut chunk = remaining.min(max_chunk);
        if affected > shrink_above {
            chunk = chunk.min(shrunk_chunk);
        }
        if chunk == 0 {
            return Err(ClmsrError::NoChunkProgress.into());
        }

        let amount = apply_chunk(tree, ctx, chunk, side)?.ok_or(ClmsrError::ArithmeticOverflow)?;

        total = checked_add(total, amount)?;
        remaining -= chunk;
        chunks += 1;
    }

    if remaining > 0 {
        msg!(
            "Chunked {:?} stopped with {} of {} left after {} chunks",
            side,
            remaining,
            quantity,
            chunks
        );
        return Err(ClmsrError::ResidualQuantity.into());
    }

    msg!(
        "Chunked {:?}: quantity={}, chunks={}, amount={}",
        side,
        quantity,
        chunks,
        total
    );
    Ok(total)
}

/// Apply one chunk to the tree and return its cost or proceeds.
///
/// Returns `None`, leaving the tree untouched, when the affected sum times
/// the chunk factor would overflow.
fn apply_chunk(
    tree: &mut DistributionTree,
    ctx: &PricingContext,
    quantity: u128,
    side: TradeSide,
) -> Result<Option<u128>, ProgramError> {
    let affected = tree.get_range_sum(ctx.lo, ctx.hi)?;
    // The range query re-aggregates its path, so the root covers `affected`
    let sum_before = tree.total_sum()?;
    let untouched = checked_sub(sum_before, affected)?;
    let factor = side.range_factor(quantity, ctx.alpha)?;

    let new_affected = match mul(affected, factor) {
        Ok(value) => value,
        Err(_) => return Ok(None),
    };
    let sum_after = checked_add(untouched, new_affected)?;

    // Rounding can swallow a tiny chunk entirely; it then costs nothing
    if sum_after == sum_before {
        return Ok(Some(0));
    }

    let ratio = sum_ratio(side, sum_before, sum_after)?;
    tree.apply_range_factor(ctx.lo, ctx.hi, factor)?;
    Ok(Some(mul(ctx.alpha, ln_unsigned(ratio)?)?))
}

/// Σ_after/Σ_before for a buy (rounded up) or Σ_before/Σ_after for a sell
/// (rounded down). The sums must move in the trade's direction.
fn sum_ratio(side: TradeSide, sum_before: u128, sum_after: u128) -> Result<u128, ProgramError> {
    match side {
        TradeSide::Buy => {
            if sum_after <= sum_before {
                return Err(ClmsrError::NonIncreasingSum.into());
            }
            div_ceil(sum_after, sum_before)
        }
        TradeSide::Sell => {
            if sum_after == 0 {
                return Err(ClmsrError::SumAfterZero.into());
            }
            if sum_after >= sum_before {
                return Err(ClmsrError::NonIncreasingSum.into());
            }
            div_floor(sum_before, sum_after)
        }
    }
}
