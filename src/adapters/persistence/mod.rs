//! Persistence Adapters - JSONL-based File Storage
//!
//! Append-only JSONL result logs, one file per day.
//! No database dependency.

pub mod results;

pub use results::{ResultLogger, ResultRecord};
