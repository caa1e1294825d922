//! Property-Based Tests — Matching Invariants
//!
//! Uses `proptest` to generate random multi-token batches and checks the
//! execution result against bounds, per-token balance, eligibility and
//! the closed-form optimum of the LP.

use std::collections::BTreeMap;

use proptest::prelude::*;

use dao_cross::cross;
use dao_cross::domain::eligibility::{self, Eligibility};
use dao_cross::domain::{Order, ReferencePrices, Side};

const TOKENS: [&str; 4] = ["BTC", "ETH", "USDT", "SOL"];
const TOL: f64 = 1e-6;

#[derive(Debug, Clone)]
struct RawOrder {
    base: usize,
    quote_offset: usize,
    side: Side,
    quantity: f64,
    /// Limit as a multiple of the implied rate.
    limit_factor: f64,
}

fn raw_order() -> impl Strategy<Value = RawOrder> {
    (
        0..TOKENS.len(),
        1..TOKENS.len(),
        prop_oneof![Just(Side::Buy), Just(Side::Sell)],
        0.1f64..100.0,
        0.5f64..1.5,
    )
        .prop_map(|(base, quote_offset, side, quantity, limit_factor)| RawOrder {
            base,
            quote_offset,
            side,
            quantity,
            limit_factor,
        })
}

fn batch() -> impl Strategy<Value = (Vec<Order>, ReferencePrices)> {
    (
        prop::collection::vec(0.5f64..10.0, TOKENS.len()),
        prop::collection::vec(raw_order(), 1..24),
    )
        .prop_map(|(values, raws)| {
            let prices: ReferencePrices = TOKENS.iter().copied().zip(values.iter().copied()).collect();
            let orders = raws
                .iter()
                .map(|raw| {
                    let quote = (raw.base + raw.quote_offset) % TOKENS.len();
                    let rate = values[quote] / values[raw.base];
                    Order::new(
                        TOKENS[raw.base],
                        TOKENS[quote],
                        raw.side,
                        raw.quantity,
                        rate * raw.limit_factor,
                    )
                    .unwrap()
                })
                .collect();
            (orders, prices)
        })
}

fn verdict(order: &Order, prices: &ReferencePrices) -> Eligibility {
    let rate = prices.get(order.quote_token()).unwrap() / prices.get(order.base_token()).unwrap();
    eligibility::check(order.side(), order.limit_price(), rate)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Results respect bounds, balance each base token and report the
    /// objective they imply.
    #[test]
    fn test_result_satisfies_invariants((orders, prices) in batch()) {
        let result = cross(&orders, &prices).unwrap();
        prop_assert_eq!(result.len(), orders.len());
        prop_assert!(result.objective >= -TOL);
        let checked = result.check(&orders, &prices, TOL);
        prop_assert!(checked.is_ok(), "invariant violated: {:?}", checked);
    }

    /// Orders whose limit conflicts with the implied rate never execute.
    #[test]
    fn test_ineligible_orders_stay_at_zero((orders, prices) in batch()) {
        let result = cross(&orders, &prices).unwrap();
        for (order, &executed) in orders.iter().zip(&result.executed) {
            if !verdict(order, &prices).is_eligible() {
                prop_assert!(
                    executed.abs() < TOL,
                    "ineligible {order} executed {executed}"
                );
            }
        }
    }

    /// Every base-token group matches the smaller of its eligible buy and
    /// sell totals, so the optimum is known in closed form.
    #[test]
    fn test_objective_matches_closed_form((orders, prices) in batch()) {
        let mut groups: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
        for order in &orders {
            let entry = groups.entry(order.base_token()).or_default();
            let cap = verdict(order, &prices).upper_bound(order);
            match order.side() {
                Side::Buy => entry.0 += cap,
                Side::Sell => entry.1 += cap,
            }
        }
        let expected: f64 = groups
            .iter()
            .map(|(token, (buys, sells))| 2.0 * prices.get(token).unwrap() * buys.min(*sells))
            .sum();

        let result = cross(&orders, &prices).unwrap();
        prop_assert!(
            (result.objective - expected).abs() < TOL * expected.max(1.0),
            "objective {} != closed form {expected}",
            result.objective
        );
    }
}
