//! Persistent state the engine computes over
//!
//! Both structures are borsh-serializable so a storage layer can persist
//! them between calls and resume the computation.

pub mod distribution_tree;
pub mod vault_state;

pub use distribution_tree::DistributionTree;
pub use vault_state::VaultState;
