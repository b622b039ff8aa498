//! Fixed-point math kernel
//!
//! WAD multiply/divide with explicit rounding plus bounded exp/ln

pub mod fixed_point;
pub mod special_functions;
pub mod u256;

pub use fixed_point::*;
pub use special_functions::*;
pub use u256::U256;
