//! Property tests for the fixed-point kernel and pool invariants
//!
//! These must hold for any input in range, independent of specific pool
//! configurations.

use proptest::prelude::*;
use wamm_amm::weights::validate_weights;
use wamm_amm::{calc_out, ln, pow, ManualClock, PoolEngine};
use wamm_config::EngineSettings;
use wamm_types::{AccountId, AssetId, SCALE};

const FEE: u64 = 1_000;

prop_compose! {
    fn scaled_value()(x in 1_000u64..1_000_000_000) -> u64 {
        x
    }
}

prop_compose! {
    fn balance()(b in 1_000u64..1_000_000_000_000) -> u64 {
        b
    }
}

prop_compose! {
    /// Two weights summing to SCALE, each at least 1%
    fn weight_pair()(w in 10_000u64..990_000) -> (u64, u64) {
        (w, SCALE - w)
    }
}

prop_compose! {
    fn moderate_weight_pair()(w in 200_000u64..800_000) -> (u64, u64) {
        (w, SCALE - w)
    }
}

prop_compose! {
    /// `count` positive weights summing exactly to SCALE
    fn weight_vector(count: usize)(raw in proptest::collection::vec(1u64..1_000, count)) -> Vec<u64> {
        let total: u64 = raw.iter().sum();
        let mut weights: Vec<u64> = raw.iter().map(|r| r * SCALE / total).collect();
        let assigned: u64 = weights.iter().sum();
        weights[0] += SCALE - assigned;
        weights
    }
}

prop_compose! {
    /// Pool size and a sequence of `(targets, duration, advance)` weight changes
    fn weight_changes()(count in 3usize..=10)(
        steps in proptest::collection::vec((weight_vector(count), 0u64..40, 0u64..40), 1..8),
        count in Just(count),
    ) -> (usize, Vec<(Vec<u64>, u64, u64)>) {
        (count, steps)
    }
}

proptest! {
    #[test]
    fn pow_with_unit_exponent_is_identity(x in scaled_value()) {
        let result = pow(x, SCALE).unwrap();
        let tolerance = x as u128 / 100_000 + 1;
        prop_assert!(
            result.abs_diff(x as u128) <= tolerance,
            "pow({}, 1.0) = {}", x, result
        );
    }

    #[test]
    fn ln_is_monotone(x in 1u64..u64::MAX / 2, step in 1u64..1_000_000) {
        let signed = |x: u64| {
            let (negative, magnitude) = ln(x).unwrap();
            if negative { -(magnitude as i128) } else { magnitude as i128 }
        };
        prop_assert!(signed(x) <= signed(x + step));
    }

    #[test]
    fn calc_out_bounded_and_monotone(
        balance_in in balance(),
        balance_out in balance(),
        (weight_in, weight_out) in weight_pair(),
        amount in 0u64..1_000_000_000_000,
        extra in 1u64..1_000_000_000,
    ) {
        let out = calc_out(balance_in, weight_in, balance_out, weight_out, amount, FEE).unwrap();
        let more = calc_out(balance_in, weight_in, balance_out, weight_out, amount + extra, FEE).unwrap();

        prop_assert!(out <= balance_out);
        prop_assert!(more >= out, "out {} then {} for +{}", out, more, extra);
    }

    #[test]
    fn swap_never_reduces_weighted_product(
        (weight_in, weight_out) in moderate_weight_pair(),
        amount in 1_000u64..1_000_000,
    ) {
        let mut engine = PoolEngine::with_clock(EngineSettings::default(), ManualClock::new(1_000));
        engine
            .bootstrap(vec![AssetId::new(1), AssetId::new(2)], vec![weight_in, weight_out])
            .unwrap();
        engine.add_liquidity(AccountId::new(1), 0, 10_000_000).unwrap();
        engine.add_liquidity(AccountId::new(1), 1, 10_000_000).unwrap();

        let value = |engine: &PoolEngine<ManualClock>| {
            let a = engine.balance(0).unwrap() as f64;
            let b = engine.balance(1).unwrap() as f64;
            a.powf(weight_in as f64 / SCALE as f64) * b.powf(weight_out as f64 / SCALE as f64)
        };

        let before = value(&engine);
        engine.swap(AccountId::new(2), 0, 1, amount).unwrap();
        let after = value(&engine);

        // Ratio truncation at SCALE precision can hand back a few units
        let slack = before * 10.0 / SCALE as f64;
        prop_assert!(after + slack >= before, "before {} after {}", before, after);
    }

    #[test]
    fn burn_all_returns_whole_pool(
        deposits in proptest::collection::vec(1_000u64..50_000_000, 2..6),
    ) {
        let count = deposits.len();
        let weight = SCALE / count as u64;
        let mut weights = vec![weight; count];
        weights[0] += SCALE - weight * count as u64;

        let mut engine = PoolEngine::with_clock(EngineSettings::default(), ManualClock::new(1_000));
        engine
            .bootstrap((1..=count as u64).map(AssetId::new).collect(), weights)
            .unwrap();

        let holder = AccountId::new(1);
        for (index, amount) in deposits.iter().enumerate() {
            engine.add_liquidity(holder, index, *amount).unwrap();
        }
        let minted = engine.get_liquidity(holder).unwrap().minted;
        let receipt = engine.burn_liquidity(holder, minted).unwrap();

        prop_assert_eq!(receipt.payouts, deposits);
        prop_assert_eq!(engine.circulating_shares(), 0);
    }

    #[test]
    fn weight_changes_keep_weights_summing_to_scale((count, steps) in weight_changes()) {
        let clock = ManualClock::new(1_700_000_000);
        let mut engine = PoolEngine::with_clock(EngineSettings::default(), clock.clone());
        let mut initial = vec![SCALE / count as u64; count];
        initial[0] += SCALE - initial.iter().sum::<u64>();
        engine
            .bootstrap((1..=count as u64).map(AssetId::new).collect(), initial)
            .unwrap();
        let tolerance = engine.settings().weight_tolerance;

        for (targets, duration, advance) in steps {
            engine.change_weights(duration, targets).unwrap();
            prop_assert!(validate_weights(&engine.state().weights, count, tolerance).is_ok());
            if let Some(status) = engine.schedule() {
                prop_assert!(validate_weights(&status.start_weights, count, tolerance).is_ok());
            }

            clock.advance(advance);
            // Each interpolated weight rounds by less than one unit
            let effective: u64 = (0..count).filter_map(|i| engine.current_weight(i)).sum();
            prop_assert!(
                effective.abs_diff(SCALE) <= count as u64 + tolerance,
                "effective weights sum to {}", effective
            );

            engine.add_liquidity(AccountId::new(1), 0, 1_000).unwrap();
            prop_assert!(
                validate_weights(&engine.state().weights, count, tolerance).is_ok(),
                "stored weights {:?}", engine.state().weights
            );
        }
    }
}
