use clmsr_engine::{
    constants::WAD,
    error::ClmsrError,
    math::safe_exp,
    calculate_quantity_from_cost, calculate_sell_proceeds, calculate_trade_cost,
    max_safe_chunk_quantity, quote_sell_proceeds, quote_trade_cost, DistributionTree,
};
use proptest::prelude::*;

/// Bin count plus a valid `[lo, hi]` inside it
fn market_range() -> impl Strategy<Value = (u32, u32, u32)> {
    (2u32..=32)
        .prop_flat_map(|bins| (Just(bins), 0..bins))
        .prop_flat_map(|(bins, lo)| (Just(bins), Just(lo), lo..bins))
}

/// Non-uniform prior weights between 0.1 and 10.0
fn prior_weights() -> impl Strategy<Value = Vec<u128>> {
    prop::collection::vec(WAD / 10..=10 * WAD, 2..=32)
}

fn within(actual: u128, expected: u128, tolerance: u128) -> bool {
    actual.abs_diff(expected) <= tolerance
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn cost_strictly_increases_with_quantity(
        (bins, lo, hi) in market_range(),
        alpha_units in 1u128..=10,
        q1 in WAD / 1_000..=4 * WAD,
        delta in WAD / 1_000..=2 * WAD,
    ) {
        let alpha = alpha_units * WAD;
        let tree = DistributionTree::with_uniform(bins, WAD).unwrap();

        let smaller = quote_trade_cost(&tree, alpha, lo, hi, q1).unwrap();
        let larger = quote_trade_cost(&tree, alpha, lo, hi, q1 + delta).unwrap();
        prop_assert!(smaller > 0);
        prop_assert!(smaller < larger, "cost({}) = {} >= cost({}) = {}", q1, smaller, q1 + delta, larger);
    }

    #[test]
    fn proceeds_strictly_increase_with_quantity(
        (bins, lo, hi) in market_range(),
        alpha_units in 1u128..=10,
        q1 in WAD / 1_000..=WAD,
        delta in WAD / 1_000..=WAD,
    ) {
        let alpha = alpha_units * WAD;
        let tree = DistributionTree::with_uniform(bins, WAD).unwrap();

        let smaller = quote_sell_proceeds(&tree, alpha, lo, hi, q1).unwrap();
        let larger = quote_sell_proceeds(&tree, alpha, lo, hi, q1 + delta).unwrap();
        prop_assert!(smaller < larger);
    }

    #[test]
    fn quantity_from_cost_recovers_quantity_on_uniform_tree(
        (bins, lo, hi) in market_range(),
        alpha_units in 1u128..=10,
        quantity in WAD / 1_000..=6 * WAD,
    ) {
        let alpha = alpha_units * WAD;
        let mut tree = DistributionTree::with_uniform(bins, WAD).unwrap();

        let cost = quote_trade_cost(&tree, alpha, lo, hi, quantity).unwrap();
        let back = calculate_quantity_from_cost(&mut tree, alpha, lo, hi, cost).unwrap();
        prop_assert!(within(back, quantity, quantity / 1_000_000 + 1_000_000), "q {} back {}", quantity, back);
    }

    #[test]
    fn quantity_from_cost_recovers_quantity_on_prior_weights(
        weights in prior_weights(),
        lo_seed in any::<u32>(),
        span_seed in any::<u32>(),
        alpha_units in 1u128..=10,
        quantity in WAD / 1_000..=3 * WAD,
    ) {
        let bins = weights.len() as u32;
        let lo = lo_seed % bins;
        let hi = lo + span_seed % (bins - lo);
        let alpha = alpha_units * WAD;
        let mut tree = DistributionTree::with_weights(&weights).unwrap();

        let cost = quote_trade_cost(&tree, alpha, lo, hi, quantity).unwrap();
        let back = calculate_quantity_from_cost(&mut tree, alpha, lo, hi, cost).unwrap();
        prop_assert!(within(back, quantity, quantity / 1_000_000 + 1_000_000), "q {} back {}", quantity, back);
    }

    #[test]
    fn quantity_from_cost_increases_with_cost(
        (bins, lo, hi) in market_range(),
        cost in WAD / 1_000..=2 * WAD,
        delta in WAD / 1_000..=WAD,
    ) {
        let mut tree = DistributionTree::with_uniform(bins, WAD).unwrap();
        let smaller = calculate_quantity_from_cost(&mut tree, WAD, lo, hi, cost).unwrap();
        let larger = calculate_quantity_from_cost(&mut tree, WAD, lo, hi, cost + delta).unwrap();
        prop_assert!(smaller < larger);
    }

    #[test]
    fn buy_then_sell_restores_total(
        weights in prior_weights(),
        lo_seed in any::<u32>(),
        span_seed in any::<u32>(),
        alpha_units in 1u128..=10,
        quantity in WAD / 1_000..=3 * WAD,
    ) {
        let bins = weights.len() as u32;
        let lo = lo_seed % bins;
        let hi = lo + span_seed % (bins - lo);
        let alpha = alpha_units * WAD;
        let mut tree = DistributionTree::with_weights(&weights).unwrap();
        let total_before = tree.total_sum().unwrap();

        let cost = calculate_trade_cost(&mut tree, alpha, lo, hi, quantity).unwrap();
        let proceeds = calculate_sell_proceeds(&mut tree, alpha, lo, hi, quantity).unwrap();

        prop_assert!(within(cost, proceeds, 10_000), "cost {} proceeds {}", cost, proceeds);
        prop_assert!(within(tree.total_sum().unwrap(), total_before, 100_000));
    }
}

#[test]
fn cost_is_continuous_across_chunk_threshold() {
    let alpha = WAD;
    let threshold = max_safe_chunk_quantity(alpha).unwrap();
    let tree = DistributionTree::with_uniform(4, WAD).unwrap();

    for delta in [1u128, 1_000, 1_000_000] {
        // Below the threshold prices in one step, above it in two chunks
        let below = quote_trade_cost(&tree, alpha, 0, 1, threshold - delta).unwrap();
        let above = quote_trade_cost(&tree, alpha, 0, 1, threshold + delta).unwrap();
        assert!(below <= above, "delta {} below {} above {}", delta, below, above);
        assert!(above - below <= 2 * delta + 100, "delta {} jump {}", delta, above - below);
    }
}

#[test]
fn chunked_buy_matches_sequential_buys() {
    let alpha = WAD;
    let threshold = max_safe_chunk_quantity(alpha).unwrap();

    let mut chunked = DistributionTree::with_uniform(4, WAD).unwrap();
    let whole = calculate_trade_cost(&mut chunked, alpha, 0, 1, threshold + WAD).unwrap();

    let mut stepped = DistributionTree::with_uniform(4, WAD).unwrap();
    let first = calculate_trade_cost(&mut stepped, alpha, 0, 1, threshold).unwrap();
    let second = calculate_trade_cost(&mut stepped, alpha, 0, 1, WAD).unwrap();

    assert_eq!(whole, first + second);
    assert_eq!(chunked.total_sum().unwrap(), stepped.total_sum().unwrap());
}

#[test]
fn full_range_buy_of_four_uniform_bins_costs_quantity() {
    let mut tree = DistributionTree::with_uniform(4, WAD).unwrap();
    let cost = calculate_trade_cost(&mut tree, WAD, 0, 3, WAD).unwrap();
    assert!(within(cost, WAD, 1), "cost {}", cost);

    // Every bin moved by e
    for bin in 0..4 {
        assert!(within(tree.get_bin_weight(bin).unwrap(), 2_718_281_828_459_045_235, 1));
    }
}

#[test]
fn safe_exp_rejects_zero_alpha() {
    assert_eq!(
        safe_exp(WAD, 0).unwrap_err(),
        ClmsrError::InvalidParameter.into()
    );
    assert_eq!(safe_exp(0, 0).unwrap_err(), ClmsrError::InvalidParameter.into());
}

#[test]
fn large_trade_on_heavy_range_uses_small_chunks() {
    // Once the range outweighs 1000·α chunks shrink to α / 10, so a 30α buy
    // still completes inside the chunk budget
    let alpha = WAD;
    let mut tree = DistributionTree::with_uniform(16, WAD).unwrap();
    let cost = calculate_trade_cost(&mut tree, alpha, 0, 7, 30 * WAD).unwrap();

    // The range ends up holding nearly all weight, so cost approaches q - α·ln(16/8)
    let floor = 30 * WAD - 693_147_180_559_945_309 - WAD / 1_000;
    assert!(cost > floor && cost < 30 * WAD, "cost {}", cost);
}
