//! CLMSR pricing and vault accounting engine
//!
//! Deterministic fixed-point core for range-outcome prediction markets.
//! Outcomes are discretized into bins whose weights live in a lazy
//! multiplicative segment tree; trades on a contiguous bin range are priced
//! with the continuous logarithmic market scoring rule, and a companion vault
//! tracks NAV, shares, share price and drawdown per accounting period.
//!
//! Everything here is a pure computation over explicit state. Account
//! handling and token transfers belong to the program that embeds the engine.

pub mod amm;
pub mod constants;
pub mod error;
pub mod math;
pub mod state;
pub mod vault;

pub use amm::clmsr::{
    calculate_quantity_from_cost, calculate_sell_proceeds, calculate_trade_cost,
    max_safe_chunk_quantity, quote_sell_proceeds, quote_trade_cost, range_price, TradeSide,
};
pub use error::ClmsrError;
pub use state::{DistributionTree, VaultState};
pub use vault::{process_batch, BatchInput, BatchOutcome};
