//! Engine-wide constants
//!
//! All fixed-point values use the WAD scale (10^18 = 1.0)

/// Fixed-point scale
pub const WAD: u128 = 1_000_000_000_000_000_000;

/// Largest exponent accepted by `exp`; exp(46) * 10^18 still fits in a u128
pub const MAX_EXP_INPUT_WAD: u128 = 46 * WAD;

/// ln(100), caps a single chunk so its factor stays inside `MAX_FACTOR`
pub const LN_100_WAD: u128 = 4_605_170_185_988_091_368;

/// Hard ceiling on chunks applied by one trade
pub const MAX_CHUNKS_PER_TX: u32 = 1_000;

/// Once the affected sum exceeds this multiple of alpha, chunks shrink to alpha / 10
pub const CHUNK_SHRINK_SUM_MULTIPLE: u128 = 1_000;

/// Divisor applied to alpha for the shrunk chunk size
pub const CHUNK_SHRINK_DIVISOR: u128 = 10;

/// Smallest factor the tree accepts in one range update (0.01)
pub const MIN_FACTOR: u128 = WAD / 100;

/// Largest factor the tree accepts in one range update (100.0)
pub const MAX_FACTOR: u128 = 100 * WAD;

/// Maximum number of outcome bins per market
pub const MAX_BIN_COUNT: u32 = 1_000_000;

/// Share price of a freshly seeded or fully redeemed vault (1.0)
pub const INITIAL_SHARE_PRICE: u128 = WAD;
