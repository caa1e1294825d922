//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies (LP backends, file I/O). Each sub-module groups
//! adapters by infrastructure concern.
//!
//! Adapter categories:
//! - `batch_file`: JSON batch files (orders + reference prices)
//! - `persistence`: JSONL execution result logging
//! - `solver`: `LinearSolver` backends (minilp)

pub mod batch_file;
pub mod persistence;
pub mod solver;
