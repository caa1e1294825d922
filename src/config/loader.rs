//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::AppConfig;

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "DAO_CROSS_CONFIG";

/// Config file used when `DAO_CROSS_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Resolve the config path from the environment.
pub fn config_path() -> String {
  std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}

/// Load and validate configuration from a TOML file.
///
/// # Arguments
/// * `path` - Path to the config.toml file
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config = parse_config(&content)?;

  info!(
    name = %config.app.name,
    time_limit_ms = config.solver.time_limit_ms,
    max_concurrent = config.runner.max_concurrent_batches,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Parse and validate configuration from TOML text.
///
/// # Errors
/// Returns error if parsing fails or validation rules are violated.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  let config: AppConfig = toml::from_str(content)
    .with_context(|| "Failed to parse config.toml")?;

  validate_config(&config)?;

  Ok(config)
}

/// Validate all configuration parameters.
fn validate_config(config: &AppConfig) -> Result<()> {
  anyhow::ensure!(
    !config.app.name.is_empty(),
    "app.name must not be empty"
  );
  anyhow::ensure!(
    matches!(
      config.app.log_level.as_str(),
      "trace" | "debug" | "info" | "warn" | "error"
    ),
    "app.log_level must be one of trace, debug, info, warn, error; got {}",
    config.app.log_level
  );

  // Solver validation
  anyhow::ensure!(
    config.solver.time_limit_ms > 0,
    "solver.time_limit_ms must be positive"
  );
  anyhow::ensure!(
    config.solver.tolerance.is_finite() && config.solver.tolerance > 0.0,
    "solver.tolerance must be a positive number, got {}",
    config.solver.tolerance
  );

  // Runner validation
  anyhow::ensure!(
    config.runner.max_concurrent_batches > 0,
    "runner.max_concurrent_batches must be positive"
  );

  // Persistence validation
  anyhow::ensure!(
    !config.persistence.enabled || !config.persistence.results_dir.is_empty(),
    "persistence.results_dir must not be empty when persistence is enabled"
  );

  Ok(())
}
