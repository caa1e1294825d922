//! Batch Runner - Concurrent Batch Solving
//!
//! Solves many independent batches, each on a blocking worker under the
//! configured solver deadline. At most `max_concurrent` batches are in
//! flight; reports come back in submission order.
//!
//! A batch that misses its deadline is reported as `SolverError::TimedOut`.
//! The worker itself is detached and finishes in the background. A result
//! that fails `ExecutionResult::check` is reported as `SolverError::Backend`.

use std::time::{Duration, Instant};

use futures_util::StreamExt;
use futures_util::stream;
use tracing::{Span, field, info, instrument, warn};
use uuid::Uuid;

use crate::adapters::batch_file::Batch;
use crate::config::AppConfig;
use crate::domain::error::{MatchError, SolverError};
use crate::domain::result::ExecutionResult;
use crate::ports::solver::LinearSolver;
use crate::usecases::cross::DaoCross;

/// Outcome of one batch.
#[derive(Debug)]
pub struct BatchReport {
  /// Runner-assigned identifier.
  pub batch_id: Uuid,
  /// Batch origin, copied from `Batch::source`.
  pub source: String,
  /// Number of orders submitted.
  pub order_count: usize,
  /// Execution result or the error that aborted the batch.
  pub outcome: Result<ExecutionResult, MatchError>,
  /// Wall time from submission to report.
  pub elapsed: Duration,
}

impl BatchReport {
  pub fn is_success(&self) -> bool {
    self.outcome.is_ok()
  }
}

/// Runs batches through a shared `DaoCross` with bounded concurrency.
pub struct BatchRunner<S: LinearSolver> {
  cross: DaoCross<S>,
  /// Per-batch solver deadline.
  time_limit: Duration,
  /// Maximum batches solved at once.
  max_concurrent: usize,
  /// Tolerance for the post-solve invariant check.
  tolerance: f64,
}

impl<S: LinearSolver> BatchRunner<S> {
  /// Create a runner from the `[solver]` and `[runner]` config sections.
  pub fn new(cross: DaoCross<S>, config: &AppConfig) -> Self {
    Self::with_limits(
      cross,
      Duration::from_millis(config.solver.time_limit_ms),
      config.runner.max_concurrent_batches,
      config.solver.tolerance,
    )
  }

  /// Create a runner with explicit limits.
  pub fn with_limits(
    cross: DaoCross<S>,
    time_limit: Duration,
    max_concurrent: usize,
    tolerance: f64,
  ) -> Self {
    Self {
      cross,
      time_limit,
      max_concurrent: max_concurrent.max(1),
      tolerance,
    }
  }

  /// Solve every batch, returning one report per batch in input order.
  #[instrument(skip(self, batches), fields(batches = batches.len(), max_concurrent = self.max_concurrent))]
  pub async fn run_all(&self, batches: Vec<Batch>) -> Vec<BatchReport> {
    let reports: Vec<BatchReport> = stream::iter(batches)
      .map(|batch| self.run_one(batch))
      .buffered(self.max_concurrent)
      .collect()
      .await;

    let failed = reports.iter().filter(|r| !r.is_success()).count();
    info!(
      total = reports.len(),
      failed,
      "All batches processed"
    );

    reports
  }

  /// Solve a single batch under the deadline.
  #[instrument(
    skip(self, batch),
    fields(source = %batch.source, orders = batch.orders.len(), batch_id = tracing::field::Empty)
  )]
  pub async fn run_one(&self, batch: Batch) -> BatchReport {
    let batch_id = Uuid::new_v4();
    Span::current().record("batch_id", field::display(batch_id));

    let started = Instant::now();
    let source = batch.source.clone();
    let order_count = batch.orders.len();
    let tolerance = self.tolerance;
    let cross = self.cross.clone();

    let worker = tokio::task::spawn_blocking(move || -> Result<ExecutionResult, MatchError> {
      let result = cross.run(&batch.orders, &batch.prices)?;
      if let Err(violation) = result.check(&batch.orders, &batch.prices, tolerance) {
        warn!(%violation, "Execution result failed invariant check");
        return Err(SolverError::Backend(format!("result failed invariant check: {violation}")).into());
      }
      Ok(result)
    });

    let outcome = match tokio::time::timeout(self.time_limit, worker).await {
      Ok(Ok(outcome)) => outcome,
      Ok(Err(join_err)) => Err(SolverError::Backend(format!("solver worker failed: {join_err}")).into()),
      Err(_) => {
        let limit_ms = u64::try_from(self.time_limit.as_millis()).unwrap_or(u64::MAX);
        warn!(limit_ms, "Solver deadline exceeded");
        Err(SolverError::TimedOut { limit_ms }.into())
      }
    };

    let elapsed = started.elapsed();
    let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
    match &outcome {
      Ok(result) => info!(objective = result.objective, elapsed_ms, "Batch solved"),
      Err(e) => warn!(error = %e, elapsed_ms, "Batch failed"),
    }

    BatchReport {
      batch_id,
      source,
      order_count,
      outcome,
      elapsed,
    }
  }
}
