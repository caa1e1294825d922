//! Configuration Module - TOML-based Matcher Configuration
//!
//! Loads and validates configuration from `config.toml`. Every section
//! except `[app]` may be omitted and falls back to its defaults.

pub mod loader;

use serde::Deserialize;

/// Top-level configuration.
///
/// Loaded from `config.toml` at startup and validated before any batch
/// is solved.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
  /// Process identity and logging.
  pub app: AppSection,
  /// LP solver limits.
  #[serde(default)]
  pub solver: SolverConfig,
  /// Batch runner concurrency.
  #[serde(default)]
  pub runner: RunnerConfig,
  /// Result log location.
  #[serde(default)]
  pub persistence: PersistenceConfig,
}

/// Process identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppSection {
  /// Human-readable instance name.
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
}

/// LP solver configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SolverConfig {
  /// Wall-clock deadline per batch (milliseconds).
  #[serde(default = "default_time_limit_ms")]
  pub time_limit_ms: u64,
  /// Absolute tolerance for the post-solve invariant check.
  #[serde(default = "default_tolerance")]
  pub tolerance: f64,
}

impl Default for SolverConfig {
  fn default() -> Self {
    Self {
      time_limit_ms: default_time_limit_ms(),
      tolerance: default_tolerance(),
    }
  }
}

/// Batch runner configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RunnerConfig {
  /// Maximum batches solved at once.
  #[serde(default = "default_max_concurrent_batches")]
  pub max_concurrent_batches: usize,
}

impl Default for RunnerConfig {
  fn default() -> Self {
    Self {
      max_concurrent_batches: default_max_concurrent_batches(),
    }
  }
}

/// Persistence configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PersistenceConfig {
  /// Write solved batches to the JSONL result log.
  #[serde(default = "default_true")]
  pub enabled: bool,
  /// Directory for daily JSONL result files.
  #[serde(default = "default_results_dir")]
  pub results_dir: String,
}

impl Default for PersistenceConfig {
  fn default() -> Self {
    Self {
      enabled: default_true(),
      results_dir: default_results_dir(),
    }
  }
}

// Default value functions for serde

fn default_log_level() -> String {
  "info".to_string()
}

fn default_true() -> bool {
  true
}

fn default_time_limit_ms() -> u64 {
  30_000
}

fn default_tolerance() -> f64 {
  1e-6
}

fn default_max_concurrent_batches() -> usize {
  4
}

fn default_results_dir() -> String {
  "data/results".to_string()
}
