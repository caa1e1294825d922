//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the domain/usecases layer
//! requires from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `LinearSolver`: maximize a linear program under bounds and equalities

pub mod solver;

pub use solver::{LinearSolver, LpSolution, SolveOutcome};
