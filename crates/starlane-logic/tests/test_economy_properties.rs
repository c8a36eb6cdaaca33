//! Property tests for the price curve, production, and route scoring.
//!
//! All tests are pure logic - no entity store, no engine.

use proptest::prelude::*;
use starlane_logic::catalog::Catalog;
use starlane_logic::economy::{run_production, ProductionOutcome};
use starlane_logic::items::{quantity, ItemId, Stock};
use starlane_logic::market::{route_profit, route_score};
use starlane_logic::pricing::{ceiling_price, floor_price, price};
use starlane_logic::stations::StationKind;

// ── Helpers ────────────────────────────────────────────────────────────

fn any_item() -> impl Strategy<Value = ItemId> {
    prop::sample::select(ItemId::ALL.to_vec())
}

fn any_kind() -> impl Strategy<Value = StationKind> {
    prop::sample::select(StationKind::ALL.to_vec())
}

fn any_stock() -> impl Strategy<Value = Stock> {
    prop::collection::btree_map(any_item(), 0u32..2000, 0..ItemId::ALL.len())
}

// ── Pricing ────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn price_stays_within_curve_bounds(
        base in 1.0f64..5000.0,
        stock in 0u32..100_000,
        target in prop::option::of(0u32..5000),
    ) {
        let p = price(base, stock, target);
        prop_assert!(p >= 1);
        prop_assert!(p >= floor_price(base));
        prop_assert!(p <= ceiling_price(base));
    }

    #[test]
    fn price_never_rises_with_stock(
        base in 1.0f64..5000.0,
        stock in 0u32..10_000,
        extra in 0u32..10_000,
        target in 1u32..5000,
    ) {
        prop_assert!(price(base, stock + extra, Some(target)) <= price(base, stock, Some(target)));
    }

    #[test]
    fn empty_stock_is_double_base(base in 1.0f64..5000.0, target in 1u32..5000) {
        prop_assert_eq!(price(base, 0, Some(target)), ((base * 2.0).round() as i64).max(1));
    }
}

// ── Production ─────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn production_is_all_or_nothing(kind in any_kind(), stock in any_stock()) {
        let catalog = Catalog::builtin();
        let Some(rule) = catalog.archetype(kind).and_then(|a| a.production.clone()) else {
            return Ok(());
        };
        let mut after = stock.clone();
        match run_production(&rule, &mut after) {
            ProductionOutcome::Produced => {
                for input in &rule.consumes {
                    let produced: u32 = rule
                        .produces
                        .iter()
                        .filter(|o| o.item == input.item)
                        .map(|o| o.rate)
                        .sum();
                    prop_assert_eq!(
                        quantity(&after, input.item) + input.rate,
                        quantity(&stock, input.item) + produced
                    );
                }
                for output in &rule.produces {
                    if !rule.consumes_item(output.item) {
                        prop_assert_eq!(
                            quantity(&after, output.item),
                            quantity(&stock, output.item) + output.rate
                        );
                    }
                }
            }
            ProductionOutcome::Starved(item) => {
                prop_assert_eq!(&after, &stock);
                let rate = rule.consumes.iter().find(|c| c.item == item).map(|c| c.rate);
                prop_assert!(rate.is_some_and(|r| quantity(&stock, item) < r));
            }
        }
    }
}

// ── Routes ─────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn profitable_routes_score_positive(
        buy in 1i64..4000,
        margin in 1i64..4000,
        unit in 1u32..100,
        distance in 0.0f32..100_000.0,
    ) {
        let profit = route_profit(buy, buy + margin, unit);
        prop_assert_eq!(profit, Some(margin * i64::from(unit)));
        prop_assert!(route_score(margin * i64::from(unit), distance) > 0.0);
    }

    #[test]
    fn unprofitable_routes_are_rejected(buy in 1i64..4000, drop in 0i64..4000) {
        prop_assert_eq!(route_profit(buy, buy - drop, 10), None);
    }
}

#[test]
fn builtin_catalog_prices_match_base_at_target() {
    let catalog = Catalog::builtin();
    for archetype in catalog.archetypes() {
        for (item, target) in &archetype.init_inventory {
            if *target == 0 {
                continue;
            }
            let base = catalog.base_price(*item).round() as i64;
            assert_eq!(catalog.price(archetype.kind, *item, *target), base.max(1));
        }
    }
}
