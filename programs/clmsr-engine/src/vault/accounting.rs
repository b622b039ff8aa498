//! Vault accounting
//!
//! Pure functions over explicit inputs. Each period the realized market
//! profit/loss, collected fees and any backstop grant are netted into NAV,
//! deposits and withdrawals clear at the resulting share price, and the
//! peak/drawdown figures are refreshed once all flows are in.

use solana_program::program_error::ProgramError;

use crate::{
    constants::{INITIAL_SHARE_PRICE, WAD},
    error::ClmsrError,
    math::{checked_add, checked_sub, div_floor, mul},
    state::VaultState,
};

/// NAV and share price before any deposit or withdrawal of the period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreBatch {
    pub nav_pre: u128,
    pub price: u128,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositOutcome {
    pub nav: u128,
    pub shares: u128,
    pub minted: u128,
    /// Part of the deposit that could not buy a whole share unit
    pub refund: u128,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithdrawOutcome {
    pub nav: u128,
    pub shares: u128,
    pub paid_out: u128,
}

/// `nav_prev + pnl + fees + grant`, failing if losses exceed everything else
pub fn net_period_flows(
    nav_prev: u128,
    pnl: i128,
    fees: u128,
    grant: u128,
) -> Result<u128, ProgramError> {
    let inflows = checked_add(checked_add(nav_prev, fees)?, grant)?;
    if pnl >= 0 {
        checked_add(inflows, pnl.unsigned_abs())
    } else {
        inflows
            .checked_sub(pnl.unsigned_abs())
            .ok_or_else(|| ClmsrError::NavUnderflow.into())
    }
}

/// Net the period's flows into NAV and derive the batch share price
pub fn compute_pre_batch(
    nav_prev: u128,
    shares_prev: u128,
    pnl: i128,
    fees: u128,
    grant: u128,
) -> Result<PreBatch, ProgramError> {
    let nav_pre = net_period_flows(nav_prev, pnl, fees, grant)?;
    if shares_prev == 0 {
        return Err(ClmsrError::ZeroShares.into());
    }
    let price = div_floor(nav_pre, shares_prev)?;
    Ok(PreBatch { nav_pre, price })
}

/// Seed an empty vault: one share per unit deposited at price 1.0
pub fn compute_seed_state(seed_amount: u128) -> Result<VaultState, ProgramError> {
    if seed_amount == 0 {
        return Err(ClmsrError::InvalidParameter.into());
    }
    Ok(VaultState {
        nav: seed_amount,
        shares: seed_amount,
        price: INITIAL_SHARE_PRICE,
        peak: INITIAL_SHARE_PRICE,
        drawdown: 0,
    })
}

/// Mint `floor(amount / price)` shares; the unconsumed remainder is refunded
pub fn apply_deposit(
    nav: u128,
    shares: u128,
    price: u128,
    amount: u128,
) -> Result<DepositOutcome, ProgramError> {
    if price == 0 {
        return Err(ClmsrError::ZeroPrice.into());
    }

    let minted = div_floor(amount, price)?;
    let consumed = mul(minted, price)?;
    let refund = checked_sub(amount, consumed)?;

    Ok(DepositOutcome {
        nav: checked_add(nav, consumed)?,
        shares: checked_add(shares, minted)?,
        minted,
        refund,
    })
}

/// Burn `withdraw_shares` and pay out `floor(withdraw_shares * price)`
pub fn apply_withdraw(
    nav: u128,
    shares: u128,
    price: u128,
    withdraw_shares: u128,
) -> Result<WithdrawOutcome, ProgramError> {
    if withdraw_shares > shares {
        return Err(ClmsrError::InsufficientShares.into());
    }

    let paid_out = mul(withdraw_shares, price)?;
    if paid_out > nav {
        return Err(ClmsrError::InsufficientNav.into());
    }

    Ok(WithdrawOutcome {
        nav: nav - paid_out,
        shares: shares - withdraw_shares,
        paid_out,
    })
}

pub fn update_peak(current_peak: u128, new_price: u128) -> u128 {
    current_peak.max(new_price)
}

/// `(peak - price) / peak`, zero when there is no peak or price is at it
pub fn compute_drawdown(price: u128, peak: u128) -> Result<u128, ProgramError> {
    if peak == 0 || price >= peak {
        return Ok(0);
    }
    let drawdown = div_floor(peak - price, peak)?;
    Ok(drawdown.min(WAD))
}

/// Price, peak and drawdown after all of the period's flows.
///
/// A fully redeemed vault reports price 1.0 and zero drawdown and keeps its
/// previous peak, so a stale low price cannot leak into risk limits.
pub fn compute_post_batch_state(
    nav: u128,
    shares: u128,
    previous_peak: u128,
) -> Result<VaultState, ProgramError> {
    if shares == 0 {
        return Ok(VaultState {
            nav,
            shares,
            price: INITIAL_SHARE_PRICE,
            peak: previous_peak,
            drawdown: 0,
        });
    }

    let price = div_floor(nav, shares)?;
    let peak = update_peak(previous_peak, price);
    let drawdown = compute_drawdown(price, peak)?;

    Ok(VaultState {
        nav,
        shares,
        price,
        peak,
        drawdown,
    })
}
