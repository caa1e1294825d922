//! DAO Cross — Entry Point
//!
//! `dao-cross <batch.json>...`
//!
//! Wiring sequence:
//! 1. Load config (path from `DAO_CROSS_CONFIG`, default `config.toml`)
//! 2. Init tracing (JSON structured logging)
//! 3. Load and validate every batch file
//! 4. Solve all batches through the `BatchRunner`
//! 5. Append solved batches to the JSONL result log
//! 6. Print one summary line per batch; exit non-zero if any failed

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};

use dao_cross::adapters::batch_file::load_batch;
use dao_cross::adapters::persistence::{ResultLogger, ResultRecord};
use dao_cross::adapters::solver::MinilpSolver;
use dao_cross::config;
use dao_cross::usecases::{BatchRunner, DaoCross};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration ───────────────────────────────
    let config_path = config::loader::config_path();
    let config = config::loader::load_config(&config_path)
        .context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new(&config.app.log_level)
                }),
        )
        .json()
        .init();

    info!(
        name = %config.app.name,
        version = env!("CARGO_PKG_VERSION"),
        config = %config_path,
        "Starting DAO Cross"
    );

    // ── 3. Load batches ─────────────────────────────────────
    let paths: Vec<String> = std::env::args().skip(1).collect();
    anyhow::ensure!(!paths.is_empty(), "usage: dao-cross <batch.json>...");

    let batches = paths
        .iter()
        .map(|path| load_batch(path))
        .collect::<Result<Vec<_>>>()?;

    // ── 4. Solve ────────────────────────────────────────────
    let cross = DaoCross::new(Arc::new(MinilpSolver::new()));
    info!(solver = cross.solver_name(), batches = batches.len(), "Solving batches");
    let runner = BatchRunner::new(cross, &config);
    let reports = runner.run_all(batches).await;

    // ── 5. Persist results ──────────────────────────────────
    let logger = if config.persistence.enabled {
        Some(
            ResultLogger::new(&config.persistence.results_dir)
                .await
                .context("Failed to open result log")?,
        )
    } else {
        None
    };

    // ── 6. Report ───────────────────────────────────────────
    let mut failed = 0usize;
    for report in reports {
        match report.outcome {
            Ok(result) => {
                println!(
                    "{}: objective {:.1}, {}/{} filled {}",
                    report.source,
                    result.objective,
                    result.filled_count(config.solver.tolerance),
                    report.order_count,
                    result.format_quantities()
                );
                if let Some(logger) = &logger {
                    let record = ResultRecord::new(report.batch_id, report.source, result);
                    logger.append(&record).await?;
                }
            }
            Err(e) => {
                failed += 1;
                error!(batch_id = %report.batch_id, source = %report.source, error = %e, "Batch failed");
                eprintln!("{}: FAILED: {e}", report.source);
            }
        }
    }

    anyhow::ensure!(failed == 0, "{failed} of {} batches failed", paths.len());

    info!("All batches matched");
    Ok(())
}
