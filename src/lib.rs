//! DAO Cross — Library Root
//!
//! Cross-token batch auction matching: every order in a batch is priced
//! in a shared reference unit, orders whose limits conflict with the
//! implied rates are excluded, and a linear program picks executed
//! quantities that maximize matched value while keeping each base token
//! balanced.
//!
//! ```no_run
//! use dao_cross::domain::{Order, ReferencePrices};
//!
//! let orders = vec![
//!     Order::buy("BTC", "ETH", 8.0, 3.0)?,
//!     Order::sell("BTC", "ETH", 9.0, 1.0)?,
//! ];
//! let prices: ReferencePrices = [("BTC", 2.0), ("ETH", 4.0)].into_iter().collect();
//! let result = dao_cross::cross(&orders, &prices)?;
//! println!("{}", result.format_quantities());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod usecases;

pub use domain::{ExecutionResult, MatchError, Order, ReferencePrices, Side, SolverError};
pub use usecases::{BatchRunner, DaoCross, cross};
