//! Distribution tree
//!
//! Lazy multiplicative segment tree holding one WAD weight per outcome bin.
//! Nodes live in two flat arrays using a 1-indexed heap layout: node `n`
//! has children `2n` and `2n + 1`, leaves start at `size`.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{msg, program_error::ProgramError};

use crate::{
    constants::{MAX_BIN_COUNT, MAX_FACTOR, MIN_FACTOR, WAD},
    error::ClmsrError,
    math::{checked_add, div_floor, mul},
};

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct DistributionTree {
    pub is_initialized: bool,
    /// Number of addressable bins
    pub num_bins: u32,
    /// Leaf count, `num_bins` rounded up to a power of two
    pub size: u32,
    /// Aggregated weight per node, index 0 unused
    pub sums: Vec<u128>,
    /// Factor owed to both children of an internal node, WAD when none
    pub pending: Vec<u128>,
}

impl DistributionTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an initialized tree with a uniform weight per bin
    pub fn with_uniform(num_bins: u32, initial_weight: u128) -> Result<Self, ProgramError> {
        let mut tree = Self::new();
        tree.init(num_bins, initial_weight)?;
        Ok(tree)
    }

    /// Create an initialized tree from prior weights
    pub fn with_weights(weights: &[u128]) -> Result<Self, ProgramError> {
        let mut tree = Self::new();
        tree.init_with_weights(weights)?;
        Ok(tree)
    }

    /// Set every bin to `initial_weight`. Padding leaves carry zero weight.
    pub fn init(&mut self, num_bins: u32, initial_weight: u128) -> Result<(), ProgramError> {
        if initial_weight == 0 {
            return Err(ClmsrError::InvalidParameter.into());
        }
        let weights = vec![initial_weight; Self::checked_bin_count(num_bins)? as usize];
        self.init_with_weights(&weights)
    }

    /// Set bin `i` to `weights[i]`
    pub fn init_with_weights(&mut self, weights: &[u128]) -> Result<(), ProgramError> {
        if self.is_initialized {
            return Err(ClmsrError::AlreadyInitialized.into());
        }
        let num_bins = u32::try_from(weights.len())
            .map_err(|_| ProgramError::from(ClmsrError::InvalidParameter))?;
        Self::checked_bin_count(num_bins)?;

        let size = num_bins.next_power_of_two() as usize;
        let mut sums = vec![0u128; 2 * size];
        sums[size..size + weights.len()].copy_from_slice(weights);
        for node in (1..size).rev() {
            sums[node] = checked_add(sums[2 * node], sums[2 * node + 1])?;
        }
        if sums[1] == 0 {
            return Err(ClmsrError::InvalidParameter.into());
        }

        self.is_initialized = true;
        self.num_bins = num_bins;
        self.size = size as u32;
        self.sums = sums;
        self.pending = vec![WAD; 2 * size];

        msg!("Distribution tree initialized: bins={}, total={}", num_bins, self.sums[1]);
        Ok(())
    }

    /// Sum of all bin weights
    pub fn total_sum(&self) -> Result<u128, ProgramError> {
        self.ensure_initialized()?;
        Ok(self.sums[1])
    }

    /// Sum of bin weights over `[lo, hi]`, pushing pending factors on the way down.
    ///
    /// Every node on the search path is re-aggregated from its children, so
    /// the root never holds less than the range just returned.
    pub fn get_range_sum(&mut self, lo: u32, hi: u32) -> Result<u128, ProgramError> {
        self.validate_range(lo, hi)?;
        self.query(1, 0, self.size - 1, lo, hi)
    }

    pub fn get_bin_weight(&mut self, bin: u32) -> Result<u128, ProgramError> {
        self.get_range_sum(bin, bin)
    }

    /// Share of total weight held by `[lo, hi]`, rounded down
    pub fn range_probability(&mut self, lo: u32, hi: u32) -> Result<u128, ProgramError> {
        let range_sum = self.get_range_sum(lo, hi)?;
        div_floor(range_sum, self.sums[1])
    }

    /// Multiply every bin weight in `[lo, hi]` by `factor`
    pub fn apply_range_factor(
        &mut self,
        lo: u32,
        hi: u32,
        factor: u128,
    ) -> Result<(), ProgramError> {
        self.validate_range(lo, hi)?;
        if !(MIN_FACTOR..=MAX_FACTOR).contains(&factor) {
            return Err(ClmsrError::InvalidFactor.into());
        }
        if factor == WAD {
            return Ok(());
        }
        self.update(1, 0, self.size - 1, lo, hi, factor)
    }

    pub fn validate_range(&self, lo: u32, hi: u32) -> Result<(), ProgramError> {
        self.ensure_initialized()?;
        if lo > hi || hi >= self.num_bins {
            return Err(ClmsrError::InvalidRange.into());
        }
        Ok(())
    }

    fn ensure_initialized(&self) -> Result<(), ProgramError> {
        if !self.is_initialized {
            return Err(ClmsrError::NotInitialized.into());
        }
        Ok(())
    }

    fn checked_bin_count(num_bins: u32) -> Result<u32, ProgramError> {
        if num_bins == 0 || num_bins > MAX_BIN_COUNT {
            return Err(ClmsrError::InvalidParameter.into());
        }
        Ok(num_bins)
    }

    fn is_leaf(&self, node: usize) -> bool {
        node >= self.size as usize
    }

    fn update(
        &mut self,
        node: usize,
        node_lo: u32,
        node_hi: u32,
        lo: u32,
        hi: u32,
        factor: u128,
    ) -> Result<(), ProgramError> {
        if hi < node_lo || node_hi < lo {
            return Ok(());
        }
        if lo <= node_lo && node_hi <= hi {
            return self.apply_to_node(node, factor);
        }

        self.push(node)?;
        let mid = node_lo + (node_hi - node_lo) / 2;
        self.update(2 * node, node_lo, mid, lo, hi, factor)?;
        self.update(2 * node + 1, mid + 1, node_hi, lo, hi, factor)?;
        self.sums[node] = checked_add(self.sums[2 * node], self.sums[2 * node + 1])?;
        Ok(())
    }

    fn query(
        &mut self,
        node: usize,
        node_lo: u32,
        node_hi: u32,
        lo: u32,
        hi: u32,
    ) -> Result<u128, ProgramError> {
        if hi < node_lo || node_hi < lo {
            return Ok(0);
        }
        if lo <= node_lo && node_hi <= hi {
            return Ok(self.sums[node]);
        }

        self.push(node)?;
        let mid = node_lo + (node_hi - node_lo) / 2;
        let left = self.query(2 * node, node_lo, mid, lo, hi)?;
        let right = self.query(2 * node + 1, mid + 1, node_hi, lo, hi)?;
        // Pushed children round per node and can drift from the parent
        self.sums[node] = checked_add(self.sums[2 * node], self.sums[2 * node + 1])?;
        checked_add(left, right)
    }

    /// Multiply a node's aggregate and, for internal nodes, its pending factor.
    ///
    /// A composed pending factor that would leave [MIN_FACTOR, MAX_FACTOR]
    /// is flushed to the children first so it never decays to zero.
    fn apply_to_node(&mut self, node: usize, factor: u128) -> Result<(), ProgramError> {
        self.sums[node] = mul(self.sums[node], factor)?;
        if self.is_leaf(node) {
            return Ok(());
        }

        let composed = mul(self.pending[node], factor)?;
        if (MIN_FACTOR..=MAX_FACTOR).contains(&composed) {
            self.pending[node] = composed;
        } else {
            self.push(node)?;
            self.pending[node] = factor;
        }
        Ok(())
    }

    /// Hand the pending factor of an internal node down to its children
    fn push(&mut self, node: usize) -> Result<(), ProgramError> {
        debug_assert!(!self.is_leaf(node));
        let factor = self.pending[node];
        if factor != WAD {
            self.apply_to_node(2 * node, factor)?;
            self.apply_to_node(2 * node + 1, factor)?;
            self.pending[node] = WAD;
        }
        Ok(())
    }
}
