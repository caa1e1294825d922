//! Execution result and its assembly from a solver assignment.
//!
//! Executed quantities are reported at the solver's native `f64`
//! precision; `format_quantities` rounds for display only.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::error::SolverError;
use super::formulation::LinearProgram;
use super::order::{Order, Side, Token};
use super::prices::ReferencePrices;

/// Objective value plus one executed quantity per input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Total traded value (both sides counted).
    pub objective: f64,
    /// Executed base-token quantity, aligned with the input orders.
    pub executed: Vec<f64>,
}

/// First property an `ExecutionResult` fails to satisfy.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvariantViolation {
    #[error("result has {got} quantities for {expected} orders")]
    Misaligned { expected: usize, got: usize },

    #[error("order {index} executed {executed} outside [0, {quantity}]")]
    OutOfBounds {
        index: usize,
        executed: f64,
        quantity: f64,
    },

    #[error("{token} is unbalanced: bought {bought}, sold {sold}")]
    Unbalanced { token: Token, bought: f64, sold: f64 },

    #[error("objective {reported} differs from traded value {recomputed}")]
    ObjectiveMismatch { reported: f64, recomputed: f64 },

    #[error("no valuation for {0}")]
    MissingPrice(Token),
}

impl ExecutionResult {
    /// Result of an empty batch.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.executed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.executed.is_empty()
    }

    /// Sum of executed quantities across all orders.
    pub fn total_executed(&self) -> f64 {
        self.executed.iter().sum()
    }

    /// Number of orders executed above `tolerance`.
    pub fn filled_count(&self, tolerance: f64) -> usize {
        self.executed.iter().filter(|q| **q > tolerance).count()
    }

    /// Buy-side matched quantity per base token.
    pub fn matched_volume(&self, orders: &[Order]) -> BTreeMap<Token, f64> {
        let mut volume: BTreeMap<Token, f64> = BTreeMap::new();
        for (order, q) in orders.iter().zip(&self.executed) {
            if order.side() == Side::Buy {
                *volume.entry(order.base_token().to_string()).or_default() += q;
            }
        }
        volume
    }

    /// Render as `"(n) q0 q1 ..."` with one decimal place.
    pub fn format_quantities(&self) -> String {
        let mut out = format!("({})", self.executed.len());
        for q in &self.executed {
            let rounded = Decimal::from_f64(*q).unwrap_or_default().round_dp(1);
            // solver noise like -1e-12 would otherwise print as -0.0
            let rounded = if rounded.is_zero() { Decimal::ZERO } else { rounded };
            out.push_str(&format!(" {rounded:.1}"));
        }
        out
    }

    /// Verify bounds, per-token balance and the objective against the
    /// batch it was computed for.
    ///
    /// # Errors
    /// The first `InvariantViolation` found.
    pub fn check(
        &self,
        orders: &[Order],
        prices: &ReferencePrices,
        tolerance: f64,
    ) -> Result<(), InvariantViolation> {
        if self.executed.len() != orders.len() {
            return Err(InvariantViolation::Misaligned {
                expected: orders.len(),
                got: self.executed.len(),
            });
        }

        let mut flow: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
        let mut recomputed = 0.0;

        for (index, (order, &executed)) in orders.iter().zip(&self.executed).enumerate() {
            if executed < -tolerance || executed > order.quantity() + tolerance {
                return Err(InvariantViolation::OutOfBounds {
                    index,
                    executed,
                    quantity: order.quantity(),
                });
            }
            let price = prices
                .get(order.base_token())
                .ok_or_else(|| InvariantViolation::MissingPrice(order.base_token().to_string()))?;
            recomputed += executed * price;

            let entry = flow.entry(order.base_token()).or_default();
            match order.side() {
                Side::Buy => entry.0 += executed,
                Side::Sell => entry.1 += executed,
            }
        }

        for (token, (bought, sold)) in flow {
            if (bought - sold).abs() > tolerance * bought.abs().max(1.0) {
                return Err(InvariantViolation::Unbalanced {
                    token: token.to_string(),
                    bought,
                    sold,
                });
            }
        }

        if (recomputed - self.objective).abs() > tolerance * recomputed.abs().max(1.0) {
            return Err(InvariantViolation::ObjectiveMismatch {
                reported: self.objective,
                recomputed,
            });
        }

        Ok(())
    }
}

/// Zip a solver assignment back onto the batch by position.
///
/// Values are clamped into their variable bounds to absorb solver
/// round-off; nothing else is altered.
///
/// # Errors
/// `SolverError::Backend` if the assignment length does not match the
/// number of variables, or if the objective or any value is not finite.
pub fn assemble(
    program: &LinearProgram,
    objective: f64,
    assignment: &[f64],
) -> Result<ExecutionResult, SolverError> {
    if assignment.len() != program.num_vars() {
        return Err(SolverError::Backend(format!(
            "assignment has {} values for {} variables",
            assignment.len(),
            program.num_vars()
        )));
    }
    if !objective.is_finite() {
        return Err(SolverError::Backend(format!("objective is {objective}")));
    }
    if let Some((index, q)) = assignment.iter().enumerate().find(|(_, q)| !q.is_finite()) {
        return Err(SolverError::Backend(format!("variable {index} is {q}")));
    }

    let executed = assignment
        .iter()
        .zip(&program.bounds)
        .map(|(&q, b)| q.clamp(b.lower, b.upper))
        .collect();

    Ok(ExecutionResult {
        objective,
        executed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::eligibility::Eligibility;
    use crate::domain::formulation;
    use rust_decimal_macros::dec;

    fn batch() -> (Vec<Order>, ReferencePrices) {
        let orders = vec![
            Order::buy("BTC", "ETH", 8.0, 3.0).unwrap(),
            Order::sell("BTC", "ETH", 9.0, 1.0).unwrap(),
        ];
        let prices = [("BTC", 2.0), ("ETH", 4.0)].into_iter().collect();
        (orders, prices)
    }

    #[test]
    fn test_format_quantities() {
        let result = ExecutionResult {
            objective: 32.0,
            executed: vec![2.0, 5.999_999_999, 7.0, -1e-12],
        };
        assert_eq!(result.format_quantities(), "(4) 2.0 6.0 7.0 0.0");
        assert_eq!(ExecutionResult::empty().format_quantities(), "(0)");
    }

    #[test]
    fn test_format_matches_decimal_rounding() {
        let q = Decimal::from_f64(1.25).unwrap().round_dp(1);
        assert_eq!(q, dec!(1.2));
    }

    #[test]
    fn test_assemble_clamps_round_off() {
        let (orders, prices) = batch();
        let lp = formulation::build(&orders, &prices, &[Eligibility::Eligible; 2]).unwrap();
        let result = assemble(&lp, 32.0, &[8.000_000_000_1, -1e-13]).unwrap();
        assert_eq!(result.executed, vec![8.0, 0.0]);
        assert_eq!(result.objective, 32.0);
    }

    #[test]
    fn test_assemble_rejects_length_mismatch() {
        let (orders, prices) = batch();
        let lp = formulation::build(&orders, &prices, &[Eligibility::Eligible; 2]).unwrap();
        assert!(matches!(
            assemble(&lp, 0.0, &[1.0]),
            Err(SolverError::Backend(_))
        ));
        assert!(assemble(&lp, f64::NAN, &[0.0, 0.0]).is_err());
    }

    #[test]
    fn test_assemble_rejects_non_finite_values() {
        let (orders, prices) = batch();
        let lp = formulation::build(&orders, &prices, &[Eligibility::Eligible; 2]).unwrap();
        assert_eq!(
            assemble(&lp, 32.0, &[f64::NAN, 8.0]),
            Err(SolverError::Backend("variable 0 is NaN".to_string()))
        );
        assert!(assemble(&lp, 32.0, &[8.0, f64::INFINITY]).is_err());
    }

    #[test]
    fn test_check_accepts_valid_result() {
        let (orders, prices) = batch();
        let result = ExecutionResult {
            objective: 32.0,
            executed: vec![8.0, 8.0],
        };
        assert_eq!(result.check(&orders, &prices, 1e-9), Ok(()));
        assert_eq!(result.matched_volume(&orders).get("BTC"), Some(&8.0));
        assert_eq!(result.total_executed(), 16.0);
        assert_eq!(result.filled_count(1e-9), 2);
    }

    #[test]
    fn test_check_reports_violations() {
        let (orders, prices) = batch();

        let unbalanced = ExecutionResult {
            objective: 28.0,
            executed: vec![8.0, 6.0],
        };
        assert!(matches!(
            unbalanced.check(&orders, &prices, 1e-9),
            Err(InvariantViolation::Unbalanced { .. })
        ));

        let over = ExecutionResult {
            objective: 36.0,
            executed: vec![9.0, 9.0],
        };
        assert!(matches!(
            over.check(&orders, &prices, 1e-9),
            Err(InvariantViolation::OutOfBounds { index: 0, .. })
        ));

        let wrong_objective = ExecutionResult {
            objective: 16.0,
            executed: vec![8.0, 8.0],
        };
        assert!(matches!(
            wrong_objective.check(&orders, &prices, 1e-9),
            Err(InvariantViolation::ObjectiveMismatch { .. })
        ));

        assert!(matches!(
            ExecutionResult::empty().check(&orders, &prices, 1e-9),
            Err(InvariantViolation::Misaligned { expected: 2, got: 0 })
        ));
    }
}
