//! CLMSR (continuous logarithmic market scoring rule) pricing engine

pub mod math;
pub mod types;
pub mod validation;

pub use math::{
    calculate_quantity_from_cost, calculate_sell_proceeds, calculate_trade_cost,
    max_safe_chunk_quantity, quote_sell_proceeds, quote_trade_cost, range_price,
};
pub use types::{PricingContext, TradeSide};
