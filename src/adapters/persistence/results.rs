//! Result Logger - Append-only JSONL Execution Results
//!
//! Persists one `ResultRecord` per solved batch to daily JSONL files in
//! the format `<results_dir>/YYYY-MM-DD.jsonl`. Each line is a self-contained
//! JSON record.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::instrument;
use uuid::Uuid;

use crate::domain::result::ExecutionResult;

/// A solved batch as written to the result log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Runner-assigned batch identifier.
    pub batch_id: Uuid,
    /// Batch origin (file path or caller label).
    pub source: String,
    /// Number of orders in the batch.
    pub order_count: usize,
    /// Objective value and per-order executed quantities.
    pub result: ExecutionResult,
    /// When the record was written.
    pub recorded_at: DateTime<Utc>,
}

impl ResultRecord {
    pub fn new(batch_id: Uuid, source: impl Into<String>, result: ExecutionResult) -> Self {
        Self {
            batch_id,
            source: source.into(),
            order_count: result.len(),
            result,
            recorded_at: Utc::now(),
        }
    }
}

/// Append-only JSONL result logger with daily file rotation.
pub struct ResultLogger {
    /// Directory holding the daily result files.
    results_dir: PathBuf,
}

impl ResultLogger {
    /// Create a new result logger writing into `results_dir`.
    pub async fn new(results_dir: &str) -> Result<Self> {
        let results_dir = Path::new(results_dir).to_path_buf();

        fs::create_dir_all(&results_dir)
            .await
            .context("Failed to create results directory")?;

        Ok(Self { results_dir })
    }

    /// Append a record to the file of the day it was recorded.
    #[instrument(skip(self, record), fields(batch_id = %record.batch_id))]
    pub async fn append(&self, record: &ResultRecord) -> Result<()> {
        let date = record.recorded_at.format("%Y-%m-%d").to_string();
        let path = self.results_dir.join(format!("{date}.jsonl"));

        let mut json = serde_json::to_string(record)
            .context("Failed to serialize result record")?;
        json.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .context("Failed to open result log file")?;

        file.write_all(json.as_bytes())
            .await
            .context("Failed to write result record")?;

        file.flush().await.context("Failed to flush result log")?;

        Ok(())
    }
}
