//! Solver Port - Linear Program Solving Interface
//!
//! The matching core never depends on a concrete LP library. Adapters
//! implement `LinearSolver` and report one of three outcomes; everything
//! except `Optimal` is fatal for the batch.

use crate::domain::formulation::LinearProgram;

/// Optimal vertex returned by a solver.
#[derive(Debug, Clone, PartialEq)]
pub struct LpSolution {
  /// Objective value at the optimum.
  pub objective: f64,
  /// One value per variable, in variable order.
  pub assignment: Vec<f64>,
}

/// Normalized solver status.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveOutcome {
  /// An optimum was found.
  Optimal(LpSolution),
  /// No assignment satisfies the constraints.
  Infeasible,
  /// The objective can grow without limit.
  Unbounded,
}

/// Trait for linear-program solvers (maximization).
///
/// Implementations must be stateless between calls so independent
/// batches can be solved concurrently from several workers.
pub trait LinearSolver: Send + Sync + 'static {
  /// Short backend name for logs.
  fn name(&self) -> &'static str;

  /// Solve `program`, maximizing its objective.
  ///
  /// # Errors
  /// Returns error only for backend failures (bad input shape, internal
  /// panics mapped to errors). Infeasible/unbounded are outcomes, not errors.
  fn solve(&self, program: &LinearProgram) -> anyhow::Result<SolveOutcome>;
}
