//! Solver Adapters - Concrete LP Backends
//!
//! Implements the `LinearSolver` port. minilp is the default backend;
//! other solver libraries plug in behind the same trait.

pub mod minilp_backend;

pub use minilp_backend::MinilpSolver;
