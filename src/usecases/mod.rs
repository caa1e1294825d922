//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic with port interfaces.
//!
//! Use cases:
//! - `DaoCross`: match one batch (rates, eligibility, LP, solve, assemble)
//! - `BatchRunner`: solve many batches concurrently under a deadline

pub mod batch_runner;
pub mod cross;

pub use batch_runner::{BatchReport, BatchRunner};
pub use cross::{DaoCross, cross};
