//! Linear-program formulation of a batch.
//!
//! One variable `q_i` per order, in batch order:
//!
//! ```text
//! maximize    Σ_i q_i · price[base_i]
//! subject to  0 <= q_i <= U_i                               for every order i
//!             Σ{buy, base=t} q_i - Σ{sell, base=t} q_i = 0   for every base token t
//! ```
//!
//! `U_i` is the order quantity when eligible, 0 otherwise. The objective
//! counts traded value once per side, so a matched unit of `t` contributes
//! `2 · price[t]`.
//!
//! Only base-token flow is conserved. When every order on a base token
//! shares one quote token, quote flow balances too; groups mixing quote
//! tokens can leave quote flow unbalanced.

use std::collections::BTreeMap;

use serde::Serialize;

use super::eligibility::Eligibility;
use super::error::MatchError;
use super::order::{Order, Side};
use super::prices::ReferencePrices;

/// Lower/upper bound of one variable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bound {
    pub lower: f64,
    pub upper: f64,
}

/// `Σ coeff · q_var = rhs`, labelled with the base token it conserves.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Equality {
    pub label: String,
    pub terms: Vec<(usize, f64)>,
    pub rhs: f64,
}

/// Solver-agnostic maximization problem.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LinearProgram {
    /// Objective coefficient per variable.
    pub objective: Vec<f64>,
    /// Bounds per variable.
    pub bounds: Vec<Bound>,
    /// Linear equality constraints.
    pub equalities: Vec<Equality>,
}

impl LinearProgram {
    pub fn num_vars(&self) -> usize {
        self.objective.len()
    }

    /// Objective value of an assignment.
    pub fn evaluate(&self, assignment: &[f64]) -> f64 {
        self.objective
            .iter()
            .zip(assignment)
            .map(|(c, q)| c * q)
            .sum()
    }

    /// Largest absolute violation of any bound or equality.
    pub fn max_violation(&self, assignment: &[f64]) -> f64 {
        let bounds = self
            .bounds
            .iter()
            .zip(assignment)
            .map(|(b, &q)| (b.lower - q).max(q - b.upper).max(0.0));
        let equalities = self.equalities.iter().map(|eq| {
            let lhs: f64 = eq
                .terms
                .iter()
                .map(|&(i, c)| c * assignment.get(i).copied().unwrap_or(0.0))
                .sum();
            (lhs - eq.rhs).abs()
        });
        bounds.chain(equalities).fold(0.0, f64::max)
    }
}

// ────────────────────────────────────────────
// Conservation index
// ────────────────────────────────────────────

/// Buy and sell order positions sharing one base token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenGroup {
    pub buys: Vec<usize>,
    pub sells: Vec<usize>,
}

/// Base token → participating order positions, built per call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConservationIndex<'a> {
    groups: BTreeMap<&'a str, TokenGroup>,
}

impl<'a> ConservationIndex<'a> {
    pub fn build(orders: &'a [Order]) -> Self {
        let mut groups: BTreeMap<&'a str, TokenGroup> = BTreeMap::new();
        for (i, order) in orders.iter().enumerate() {
            let group = groups.entry(order.base_token()).or_default();
            match order.side() {
                Side::Buy => group.buys.push(i),
                Side::Sell => group.sells.push(i),
            }
        }
        Self { groups }
    }

    pub fn group(&self, token: &str) -> Option<&TokenGroup> {
        self.groups.get(token)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &TokenGroup)> + '_ {
        self.groups.iter().map(|(t, g)| (*t, g))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

// ────────────────────────────────────────────
// Builder
// ────────────────────────────────────────────

/// Build bounds, conservation equalities and the traded-value objective.
///
/// Positions missing from `eligibility` are bounded at zero.
///
/// # Errors
/// `MatchError::InvalidPrice` if a base token has no usable valuation.
pub fn build(
    orders: &[Order],
    prices: &ReferencePrices,
    eligibility: &[Eligibility],
) -> Result<LinearProgram, MatchError> {
    let mut objective = Vec::with_capacity(orders.len());
    let mut bounds = Vec::with_capacity(orders.len());

    for (i, order) in orders.iter().enumerate() {
        let verdict = eligibility.get(i).copied().unwrap_or(Eligibility::Ineligible);
        objective.push(prices.valuation(order.base_token())?);
        bounds.push(Bound {
            lower: 0.0,
            upper: verdict.upper_bound(order),
        });
    }

    let index = ConservationIndex::build(orders);
    let equalities = index
        .iter()
        .map(|(token, group)| Equality {
            label: token.to_string(),
            terms: group
                .buys
                .iter()
                .map(|&i| (i, 1.0))
                .chain(group.sells.iter().map(|&i| (i, -1.0)))
                .collect(),
            rhs: 0.0,
        })
        .collect();

    Ok(LinearProgram {
        objective,
        bounds,
        equalities,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orders() -> Vec<Order> {
        vec![
            Order::buy("BTC", "ETH", 4.0, 3.0).unwrap(),
            Order::sell("ETH", "BTC", 6.0, 0.1).unwrap(),
            Order::sell("BTC", "ETH", 5.0, 1.5).unwrap(),
            Order::buy("ETH", "BTC", 2.0, 2.0).unwrap(),
        ]
    }

    fn prices() -> ReferencePrices {
        [("BTC", 3.0), ("ETH", 6.0)].into_iter().collect()
    }

    #[test]
    fn test_conservation_index_groups_by_base() {
        let orders = orders();
        let index = ConservationIndex::build(&orders);
        assert_eq!(index.len(), 2);
        assert_eq!(
            index.group("BTC"),
            Some(&TokenGroup { buys: vec![0], sells: vec![2] })
        );
        assert_eq!(
            index.group("ETH"),
            Some(&TokenGroup { buys: vec![3], sells: vec![1] })
        );
    }

    #[test]
    fn test_build_objective_and_bounds() {
        let orders = orders();
        let eligibility = [
            Eligibility::Eligible,
            Eligibility::Eligible,
            Eligibility::Ineligible,
            Eligibility::Eligible,
        ];
        let lp = build(&orders, &prices(), &eligibility).unwrap();
        assert_eq!(lp.num_vars(), 4);
        assert_eq!(lp.objective, vec![3.0, 6.0, 3.0, 6.0]);
        assert_eq!(lp.bounds[0], Bound { lower: 0.0, upper: 4.0 });
        assert_eq!(lp.bounds[2], Bound { lower: 0.0, upper: 0.0 });
        assert_eq!(lp.equalities.len(), 2);
        assert_eq!(lp.equalities[0].label, "BTC");
        assert_eq!(lp.equalities[0].terms, vec![(0, 1.0), (2, -1.0)]);
        assert_eq!(lp.equalities[1].terms, vec![(3, 1.0), (1, -1.0)]);
    }

    #[test]
    fn test_evaluate_and_violation() {
        let orders = orders();
        let lp = build(&orders, &prices(), &[Eligibility::Eligible; 4]).unwrap();
        let balanced = [4.0, 2.0, 4.0, 2.0];
        assert_eq!(lp.evaluate(&balanced), 4.0 * 3.0 * 2.0 + 2.0 * 6.0 * 2.0);
        assert_eq!(lp.max_violation(&balanced), 0.0);

        let unbalanced = [4.0, 0.0, 1.0, 0.0];
        assert_eq!(lp.max_violation(&unbalanced), 3.0);

        let over_bound = [5.0, 0.0, 5.0, 0.0];
        assert_eq!(lp.max_violation(&over_bound), 1.0);
    }

    #[test]
    fn test_build_missing_base_price() {
        let orders = orders();
        let prices: ReferencePrices = [("ETH", 6.0)].into_iter().collect();
        assert!(build(&orders, &prices, &[Eligibility::Eligible; 4]).is_err());
    }
}
