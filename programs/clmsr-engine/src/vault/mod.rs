//! Vault Module
//!
//! Share accounting for the liquidity-provider vault backing the markets

pub mod accounting;
pub mod batch;

pub use accounting::*;
pub use batch::*;
