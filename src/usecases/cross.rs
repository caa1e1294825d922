//! DAO Cross - Batch Matching Orchestrator
//!
//! One call matches one batch:
//! 1. Resolve implied rates from the reference prices
//! 2. Classify every order as eligible or not
//! 3. Build the conservation LP
//! 4. Solve through the `LinearSolver` port
//! 5. Assemble executed quantities back onto the batch
//!
//! The orchestrator holds no state between calls; the same instance can
//! serve any number of concurrent batches.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::adapters::solver::MinilpSolver;
use crate::domain::eligibility;
use crate::domain::error::{MatchError, SolverError};
use crate::domain::formulation;
use crate::domain::order::Order;
use crate::domain::prices::ReferencePrices;
use crate::domain::rates::ImpliedRates;
use crate::domain::result::{self, ExecutionResult};
use crate::ports::solver::{LinearSolver, SolveOutcome};

/// Matches batches of cross-token orders against reference prices.
pub struct DaoCross<S: LinearSolver> {
  /// Solver port.
  solver: Arc<S>,
}

impl<S: LinearSolver> DaoCross<S> {
  /// Create an orchestrator around a solver backend.
  pub fn new(solver: Arc<S>) -> Self {
    Self { solver }
  }

  /// Backend name, for logs.
  pub fn solver_name(&self) -> &'static str {
    self.solver.name()
  }

  /// Compute the volume-maximizing executed quantity for every order.
  ///
  /// `result.executed[i]` belongs to `orders[i]`. An empty batch yields
  /// an empty result without consulting the solver.
  ///
  /// # Errors
  /// - `MatchError::InvalidPrice` if a referenced token has no positive price
  /// - `MatchError::Solver` if the backend fails or reports no optimum
  #[instrument(skip(self, orders, prices), fields(orders = orders.len(), solver = self.solver.name()))]
  pub fn run(
    &self,
    orders: &[Order],
    prices: &ReferencePrices,
  ) -> Result<ExecutionResult, MatchError> {
    if orders.is_empty() {
      debug!("Empty batch, nothing to match");
      return Ok(ExecutionResult::empty());
    }

    let rates = ImpliedRates::resolve(orders, prices)?;
    let verdicts = eligibility::classify(orders, &rates)?;
    let program = formulation::build(orders, prices, &verdicts)?;

    let eligible = verdicts.iter().filter(|v| v.is_eligible()).count();
    debug!(
      eligible,
      equalities = program.equalities.len(),
      "Linear program built"
    );

    let outcome = self
      .solver
      .solve(&program)
      .map_err(|e| SolverError::Backend(format!("{e:#}")))?;

    let solution = match outcome {
      SolveOutcome::Optimal(solution) => solution,
      SolveOutcome::Infeasible => {
        warn!("Solver reported the batch infeasible");
        return Err(SolverError::Infeasible.into());
      }
      SolveOutcome::Unbounded => {
        warn!("Solver reported the batch unbounded");
        return Err(SolverError::Unbounded.into());
      }
    };

    debug!(
      reported = solution.objective,
      recomputed = program.evaluate(&solution.assignment),
      residual = program.max_violation(&solution.assignment),
      "Solver returned optimum"
    );

    let result = result::assemble(&program, solution.objective, &solution.assignment)?;

    info!(
      objective = result.objective,
      eligible,
      executed = result.total_executed(),
      "Batch matched"
    );

    Ok(result)
  }
}

impl<S: LinearSolver> Clone for DaoCross<S> {
  fn clone(&self) -> Self {
    Self {
      solver: Arc::clone(&self.solver),
    }
  }
}

/// Match one batch with the bundled minilp backend.
///
/// # Errors
/// See [`DaoCross::run`].
pub fn cross(orders: &[Order], prices: &ReferencePrices) -> Result<ExecutionResult, MatchError> {
  DaoCross::new(Arc::new(MinilpSolver::new())).run(orders, prices)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn prices(pairs: &[(&str, f64)]) -> ReferencePrices {
    pairs.iter().map(|&(t, p)| (t, p)).collect()
  }

  #[test]
  fn test_empty_batch() {
    let result = cross(&[], &ReferencePrices::new()).unwrap();
    assert!(result.is_empty());
    assert_eq!(result.objective, 0.0);
  }

  #[test]
  fn test_two_sided_match() {
    let orders = vec![
      Order::buy("BTC", "ETH", 8.0, 3.0).unwrap(),
      Order::sell("BTC", "ETH", 9.0, 1.0).unwrap(),
    ];
    let prices = prices(&[("BTC", 2.0), ("ETH", 4.0)]);

    let result = cross(&orders, &prices).unwrap();
    assert!((result.objective - 32.0).abs() < 1e-6);
    assert!((result.executed[0] - 8.0).abs() < 1e-6);
    assert!((result.executed[1] - 8.0).abs() < 1e-6);
    result.check(&orders, &prices, 1e-6).unwrap();
  }

  #[test]
  fn test_missing_quote_price_is_input_error() {
    let orders = vec![Order::buy("BTC", "ETH", 1.0, 3.0).unwrap()];
    let err = cross(&orders, &prices(&[("BTC", 2.0)])).unwrap_err();
    assert!(err.is_input_error());
  }

  #[test]
  fn test_one_sided_batch_executes_nothing() {
    let orders = vec![
      Order::buy("BTC", "ETH", 3.0, 5.0).unwrap(),
      Order::buy("BTC", "ETH", 4.0, 5.0).unwrap(),
    ];
    let result = cross(&orders, &prices(&[("BTC", 2.0), ("ETH", 4.0)])).unwrap();
    assert!(result.objective.abs() < 1e-9);
    assert!(result.executed.iter().all(|q| q.abs() < 1e-9));
  }
}
