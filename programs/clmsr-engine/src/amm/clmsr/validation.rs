//! CLMSR input validation

use solana_program::entrypoint::ProgramResult;

use crate::{
    error::ClmsrError,
    state::DistributionTree,
};

/// The liquidity parameter divides every exponent and can never be zero
pub fn validate_liquidity_parameter(alpha: u128) -> ProgramResult {
    if alpha == 0 {
        return Err(ClmsrError::InvalidParameter.into());
    }
    Ok(())
}

/// Validate a trade range against the market's tree
pub fn validate_trade_range(tree: &DistributionTree, lo: u32, hi: u32) -> ProgramResult {
    tree.validate_range(lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::WAD;

    #[test]
    fn test_zero_alpha_rejected() {
        assert_eq!(
            validate_liquidity_parameter(0).unwrap_err(),
            ClmsrError::InvalidParameter.into()
        );
        assert!(validate_liquidity_parameter(1).is_ok());
    }

    #[test]
    fn test_trade_range() {
        let tree = DistributionTree::with_uniform(10, WAD).unwrap();
        assert!(validate_trade_range(&tree, 0, 9).is_ok());
        assert!(validate_trade_range(&tree, 9, 9).is_ok());
        assert!(validate_trade_range(&tree, 5, 4).is_err());
        assert!(validate_trade_range(&tree, 0, 10).is_err());
        assert_eq!(
            validate_trade_range(&DistributionTree::new(), 0, 0).unwrap_err(),
            ClmsrError::NotInitialized.into()
        );
    }
}
