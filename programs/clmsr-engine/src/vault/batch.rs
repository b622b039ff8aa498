//! Period batch processing
//!
//! Runs one full accounting period over a vault: net the period's flows into
//! NAV, clear every queued deposit and withdrawal at the single batch price,
//! then refresh price, peak and drawdown.

use solana_program::{msg, program_error::ProgramError};

use crate::{
    constants::INITIAL_SHARE_PRICE,
    state::VaultState,
    vault::accounting::{
        apply_deposit, apply_withdraw, compute_post_batch_state, compute_pre_batch,
        net_period_flows,
    },
};

/// Flows queued for one accounting period
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchInput {
    /// Realized market profit (positive) or loss (negative)
    pub pnl: i128,
    pub fees: u128,
    pub grant: u128,
    /// Deposit amounts, cleared in order
    pub deposits: Vec<u128>,
    /// Share amounts to redeem, cleared after all deposits
    pub withdrawals: Vec<u128>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    pub state: VaultState,
    /// Price every deposit and withdrawal cleared at
    pub batch_price: u128,
    /// Shares minted per deposit
    pub minted: Vec<u128>,
    /// Refund per deposit
    pub refunds: Vec<u128>,
    /// Amount paid per withdrawal
    pub payouts: Vec<u128>,
}

/// Process one period against `previous`.
///
/// An empty vault clears its deposits at price 1.0, which is how the first
/// deposit seeds it. Any failure aborts the whole batch; `previous` is never
/// modified.
pub fn process_batch(
    previous: &VaultState,
    batch: &BatchInput,
) -> Result<BatchOutcome, ProgramError> {
    let (mut nav, batch_price) = if previous.is_empty() {
        let nav = net_period_flows(previous.nav, batch.pnl, batch.fees, batch.grant)?;
        (nav, INITIAL_SHARE_PRICE)
    } else {
        let pre = compute_pre_batch(
            previous.nav,
            previous.shares,
            batch.pnl,
            batch.fees,
            batch.grant,
        )?;
        (pre.nav_pre, pre.price)
    };
    let mut shares = previous.shares;

    msg!(
        "Batch start: nav={}, shares={}, price={}",
        nav,
        shares,
        batch_price
    );

    let mut minted = Vec::with_capacity(batch.deposits.len());
    let mut refunds = Vec::with_capacity(batch.deposits.len());
    for &amount in &batch.deposits {
        let deposit = apply_deposit(nav, shares, batch_price, amount)?;
        nav = deposit.nav;
        shares = deposit.shares;
        minted.push(deposit.minted);
        refunds.push(deposit.refund);
    }

    let mut payouts = Vec::with_capacity(batch.withdrawals.len());
    for &withdraw_shares in &batch.withdrawals {
        let withdrawal = apply_withdraw(nav, shares, batch_price, withdraw_shares)?;
        nav = withdrawal.nav;
        shares = withdrawal.shares;
        payouts.push(withdrawal.paid_out);
    }

    let state = compute_post_batch_state(nav, shares, previous.peak)?;

    msg!(
        "Batch end: nav={}, shares={}, price={}, peak={}, drawdown={}",
        state.nav,
        state.shares,
        state.price,
        state.peak,
        state.drawdown
    );

    Ok(BatchOutcome {
        state,
        batch_price,
        minted,
        refunds,
        payouts,
    })
}
