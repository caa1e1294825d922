//! minilp Backend — Pure-Rust Simplex Adapter for the Solver Port
//!
//! Translates a `LinearProgram` into a `minilp::Problem`, solves it, and
//! maps minilp's statuses onto `SolveOutcome`. No native libraries are
//! involved, so the adapter runs anywhere the crate builds.

use anyhow::{Context, Result, anyhow};
use ::minilp::{ComparisonOp, LinearExpr, OptimizationDirection, Problem, Variable};
use tracing::{debug, instrument};

use crate::domain::formulation::LinearProgram;
use crate::ports::solver::{LinearSolver, LpSolution, SolveOutcome};

/// Stateless adapter around minilp's dual simplex.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinilpSolver;

impl MinilpSolver {
    pub fn new() -> Self {
        Self
    }

    /// Build the minilp problem, returning it with its variables in order.
    fn translate(program: &LinearProgram) -> Result<(Problem, Vec<Variable>)> {
        anyhow::ensure!(
            program.objective.len() == program.bounds.len(),
            "{} objective coefficients for {} bounded variables",
            program.objective.len(),
            program.bounds.len()
        );

        let mut problem = Problem::new(OptimizationDirection::Maximize);
        let vars: Vec<Variable> = program
            .objective
            .iter()
            .zip(&program.bounds)
            .map(|(&coeff, bound)| problem.add_var(coeff, (bound.lower, bound.upper)))
            .collect();

        for equality in &program.equalities {
            let mut expr = LinearExpr::empty();
            for &(index, coeff) in &equality.terms {
                let var = vars.get(index).copied().with_context(|| {
                    format!(
                        "constraint {} references variable {index} of {}",
                        equality.label,
                        vars.len()
                    )
                })?;
                expr.add(var, coeff);
            }
            problem.add_constraint(expr, ComparisonOp::Eq, equality.rhs);
        }

        Ok((problem, vars))
    }
}

impl LinearSolver for MinilpSolver {
    fn name(&self) -> &'static str {
        "minilp"
    }

    #[instrument(skip(self, program), fields(vars = program.num_vars(), equalities = program.equalities.len()))]
    fn solve(&self, program: &LinearProgram) -> Result<SolveOutcome> {
        let (problem, vars) = Self::translate(program)?;

        match problem.solve() {
            Ok(solution) => {
                let assignment: Vec<f64> = vars.iter().map(|&v| solution[v]).collect();
                // minilp reports an unbounded ray as an infinite "optimum"
                if !solution.objective().is_finite() || assignment.iter().any(|q| !q.is_finite()) {
                    debug!(objective = solution.objective(), "minilp returned a non-finite optimum");
                    return Ok(SolveOutcome::Unbounded);
                }
                debug!(objective = solution.objective(), "minilp found optimum");
                Ok(SolveOutcome::Optimal(LpSolution {
                    objective: solution.objective(),
                    assignment,
                }))
            }
            Err(::minilp::Error::Infeasible) => Ok(SolveOutcome::Infeasible),
            Err(::minilp::Error::Unbounded) => Ok(SolveOutcome::Unbounded),
            #[allow(unreachable_patterns)]
            Err(other) => Err(anyhow!("minilp failed: {other:?}")),
        }
    }
}
