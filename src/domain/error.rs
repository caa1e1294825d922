//! Matching errors.
//!
//! Input problems are rejected before any constraint is built; solver
//! problems are fatal for the call. Neither is ever turned into an
//! all-zero result.

use thiserror::Error;

use super::order::{OrderError, Token};

/// Why a reference price could not be used.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceIssue {
    /// No entry for the token in the snapshot.
    Missing,
    /// Entry is zero, negative, NaN or infinite.
    NotPositive(f64),
}

impl std::fmt::Display for PriceIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "missing"),
            Self::NotPositive(value) => write!(f, "not a positive finite value ({value})"),
        }
    }
}

/// Non-optimal or failed delegated solve.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    #[error("linear program is infeasible")]
    Infeasible,

    #[error("linear program is unbounded")]
    Unbounded,

    #[error("solver exceeded its {limit_ms} ms deadline")]
    TimedOut { limit_ms: u64 },

    #[error("solver backend failure: {0}")]
    Backend(String),
}

/// Fatal error for one matching call.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("invalid reference price for {token}: {issue}")]
    InvalidPrice { token: Token, issue: PriceIssue },

    #[error("order {index} is malformed: {source}")]
    InvalidOrder {
        index: usize,
        #[source]
        source: OrderError,
    },

    #[error(transparent)]
    Solver(#[from] SolverError),
}

impl MatchError {
    /// True for errors caused by the batch or the price snapshot.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidPrice { .. } | Self::InvalidOrder { .. })
    }
}
