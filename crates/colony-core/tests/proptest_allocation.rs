//! Property-based tests for the allocation clamp and full entity turns.
//!
//! Uses proptest to generate random pools and group mixes, then verify the
//! allocation invariants hold whatever the inputs.

use colony_core::allocation::{Limit, UnitCosts, clamp_units, operating_grant, operating_limits};
use colony_core::catalog::UnitKind;
use colony_core::entity::{Entity, EntityKind};
use colony_core::id::EntityId;
use colony_core::resources::ResourceConstraints;
use colony_core::test_utils::*;
use colony_core::turn::TurnEngine;
use colony_core::validation::check_report;
use proptest::prelude::*;

// ===========================================================================
// Generators
// ===========================================================================

fn arb_pool() -> impl Strategy<Value = ResourceConstraints> {
    (
        0.0..5_000.0f64,
        0.0..5_000.0f64,
        0.0..20_000.0f64,
        0.0..5_000.0f64,
        0.0..5_000.0f64,
        0.0..5_000.0f64,
    )
        .prop_map(|(fuel, pro, usk, aut, metals, non_metals)| {
            ResourceConstraints::empty()
                .with_fuel(fuel)
                .with_pro(pro)
                .with_usk(usk)
                .with_aut(aut)
                .with_metals(metals)
                .with_non_metals(non_metals)
        })
}

fn arb_limit() -> impl Strategy<Value = Limit> {
    (0.0..10.0f64, 0.0..10_000.0f64).prop_map(|(per_unit, available)| Limit::new(per_unit, available))
}

fn arb_costs() -> impl Strategy<Value = UnitCosts> {
    (0.01..5.0f64, 0.0..3.0f64, 0.0..5.0f64).prop_map(|(fuel, pro, labor)| UnitCosts { fuel, pro, labor })
}

/// A colony with a random mix of groups at random sizes.
fn arb_entity() -> impl Strategy<Value = Entity> {
    (
        proptest::collection::vec((1u8..=5, 0u64..2_000), 0..4),
        proptest::collection::vec((1u8..=5, 0u64..500, 1.0..100.0f64), 0..3),
        proptest::collection::vec((1u8..=3, 0u64..200), 0..3),
    )
        .prop_map(|(farms, mines, factories)| {
            let mut e = Entity::new(EntityId(1), EntityKind::Colony, 1);
            let mut next = 0u32;
            for (tl, units) in farms {
                next += 1;
                e.farms.push(farm_group(next, next as u16, tl, units));
            }
            for (tl, units, yield_pct) in mines {
                next += 1;
                let deposit = metals_deposit(next, yield_pct, Some(10_000.0));
                e.mines.push(mine_group(next, next as u16, deposit, tl, units));
            }
            for (tl, units) in factories {
                next += 1;
                e.factories
                    .push(factory_group(next, next as u16, UnitKind::Automation, tl, units));
            }
            e
        })
}

// ===========================================================================
// Clamp properties
// ===========================================================================

proptest! {
    #[test]
    fn clamp_result_is_affordable(
        ceiling in 0u64..100_000,
        limits in proptest::collection::vec(arb_limit(), 0..4),
    ) {
        let n = clamp_units(ceiling, &limits);
        prop_assert!(n <= ceiling);
        for l in &limits {
            if l.per_unit > 0.0 {
                prop_assert!(l.per_unit * n as f64 <= l.available);
            }
        }
    }

    #[test]
    fn clamp_is_maximal(
        ceiling in 1u64..10_000,
        limits in proptest::collection::vec(arb_limit(), 1..4),
    ) {
        let n = clamp_units(ceiling, &limits);
        if n < ceiling {
            // One more unit must break at least one limit.
            let next = (n + 1) as f64;
            prop_assert!(limits.iter().any(|l| l.per_unit > 0.0 && l.per_unit * next > l.available));
        }
    }

    #[test]
    fn clamp_is_monotone_in_supply(
        ceiling in 0u64..10_000,
        per_unit in 0.01..10.0f64,
        available in 0.0..10_000.0f64,
        extra in 0.0..10_000.0f64,
    ) {
        let less = clamp_units(ceiling, &[Limit::new(per_unit, available)]);
        let more = clamp_units(ceiling, &[Limit::new(per_unit, available + extra)]);
        prop_assert!(less <= more);
    }

    #[test]
    fn zero_supply_means_zero_units(ceiling in 0u64..10_000, per_unit in 0.01..10.0f64) {
        prop_assert_eq!(clamp_units(ceiling, &[Limit::new(per_unit, 0.0)]), 0);
    }

    #[test]
    fn grant_prefers_automation(
        n_max in 0u64..1_000,
        costs in arb_costs(),
        pool in arb_pool(),
    ) {
        let n = clamp_units(n_max, &operating_limits(&costs, &pool));
        let granted = operating_grant(n, &costs, &pool);
        let labor = n as f64 * costs.labor;
        // Workers are only drawn once automation is used up.
        if granted.usk > 0.0 {
            prop_assert!((granted.aut - pool.aut).abs() < 1e-9 || granted.aut >= labor - 1e-9);
        }
        prop_assert!(granted.aut <= pool.aut);
        prop_assert!(granted.usk <= pool.usk);
        prop_assert!(granted.fuel <= pool.fuel);
        prop_assert!(granted.pro <= pool.pro);
    }
}

// ===========================================================================
// Whole-turn properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn turn_never_overdraws_pool(mut entity in arb_entity(), pool in arb_pool()) {
        let engine = TurnEngine::standard();
        let report = engine.process_entity(&mut entity, pool.clone());
        let total = report.total_allocated();
        let released = report.groups.iter().fold(0.0, |acc, g| acc + g.released.metals);

        prop_assert!(total.fuel <= pool.fuel + 1e-6);
        prop_assert!(total.pro <= pool.pro + 1e-6);
        prop_assert!(total.usk <= pool.usk + 1e-6);
        prop_assert!(total.aut <= pool.aut + 1e-6);
        prop_assert!(total.metals <= pool.metals + released + 1e-6);
        prop_assert!(((pool.fuel - total.fuel) - report.remaining.fuel).abs() < 1e-6);
        prop_assert!(((pool.pro - total.pro) - report.remaining.pro).abs() < 1e-6);
    }

    #[test]
    fn turn_reports_satisfy_invariants(mut entity in arb_entity(), pool in arb_pool()) {
        let engine = TurnEngine::standard();
        let report = engine.process_entity(&mut entity, pool);
        prop_assert_eq!(check_report(&report, &entity), vec![]);
    }

    #[test]
    fn more_fuel_never_means_less_food(
        units in 0u64..5_000,
        fuel in 0.0..1_000.0f64,
        extra in 0.0..1_000.0f64,
    ) {
        let engine = TurnEngine::standard();
        let food = |fuel: f64| {
            let mut e = Entity::new(EntityId(1), EntityKind::Colony, 1);
            e.farms.push(farm_group(1, 1, 1, units));
            let report = engine.process_entity(&mut e, labor_pool(fuel, 1e9, 1e9));
            report.groups[0].produced.iter().map(|p| p.quantity).sum::<f64>()
        };
        prop_assert!(food(fuel) <= food(fuel + extra));
    }

    #[test]
    fn want_is_idempotent(entity in arb_entity()) {
        let engine = TurnEngine::standard();
        let first = engine.want(&entity);
        prop_assert_eq!(engine.want(&entity), first);
    }
}
