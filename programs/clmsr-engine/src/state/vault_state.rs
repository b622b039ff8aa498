//! Liquidity-provider vault state

use borsh::{BorshDeserialize, BorshSerialize};

use crate::constants::INITIAL_SHARE_PRICE;

/// Vault figures after the most recent accounting period.
///
/// All values are WAD. `drawdown` is a fraction of 1.0.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct VaultState {
    /// Net asset value
    pub nav: u128,
    /// Outstanding shares
    pub shares: u128,
    /// nav / shares, or 1.0 for an empty vault
    pub price: u128,
    /// Highest price seen, never decreases
    pub peak: u128,
    /// 1 - price / peak
    pub drawdown: u128,
}

impl VaultState {
    /// A vault that has never been seeded
    pub const fn empty() -> Self {
        Self {
            nav: 0,
            shares: 0,
            price: INITIAL_SHARE_PRICE,
            peak: 0,
            drawdown: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.shares == 0
    }
}

impl Default for VaultState {
    fn default() -> Self {
        Self::empty()
    }
}
