//! Domain layer - Batch auction model and LP formulation.
//!
//! Pure, synchronous logic: no I/O and no solver dependency. The solver
//! is reached through `crate::ports::solver`.
//!
//! Pipeline: `rates` → `eligibility` → `formulation` → (solver) → `result`.

pub mod eligibility;
pub mod error;
pub mod formulation;
pub mod order;
pub mod prices;
pub mod rates;
pub mod result;

// Re-export core types for convenience
pub use eligibility::Eligibility;
pub use error::{MatchError, PriceIssue, SolverError};
pub use formulation::{Bound, ConservationIndex, Equality, LinearProgram};
pub use order::{Order, OrderError, OrderMeta, Side, Token};
pub use prices::ReferencePrices;
pub use rates::ImpliedRates;
pub use result::{ExecutionResult, InvariantViolation};
