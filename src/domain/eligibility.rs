//! Eligibility classification.
//!
//! A buy caps the rate it accepts, a sell floors it:
//! - Buy is eligible iff `limit_price >= rate`
//! - Sell is eligible iff `limit_price <= rate`
//!
//! Equality is eligible. Ineligible orders are not removed from the batch;
//! their execution is bounded at zero so results stay position-aligned.

use tracing::debug;

use super::error::{MatchError, PriceIssue};
use super::order::{Order, Side};
use super::rates::ImpliedRates;

/// Outcome of the limit-price check for one order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    Eligible,
    Ineligible,
}

impl Eligibility {
    pub fn is_eligible(self) -> bool {
        self == Self::Eligible
    }

    /// Upper bound on the executed quantity of `order`.
    pub fn upper_bound(self, order: &Order) -> f64 {
        match self {
            Self::Eligible => order.quantity(),
            Self::Ineligible => 0.0,
        }
    }
}

/// Compare a limit price with the implied rate of its pair.
pub fn check(side: Side, limit_price: f64, rate: f64) -> Eligibility {
    let ok = match side {
        Side::Buy => limit_price >= rate,
        Side::Sell => limit_price <= rate,
    };
    if ok {
        Eligibility::Eligible
    } else {
        Eligibility::Ineligible
    }
}

/// Classify every order of the batch, in order.
///
/// # Errors
/// `MatchError::InvalidPrice` if an order's pair was not resolved; this
/// cannot happen when `rates` was resolved from the same batch.
pub fn classify(orders: &[Order], rates: &ImpliedRates) -> Result<Vec<Eligibility>, MatchError> {
    orders
        .iter()
        .enumerate()
        .map(|(i, order)| {
            let rate = rates.for_order(order).ok_or_else(|| MatchError::InvalidPrice {
                token: order.quote_token().to_string(),
                issue: PriceIssue::Missing,
            })?;
            let verdict = check(order.side(), order.limit_price(), rate);
            if !verdict.is_eligible() {
                debug!(
                    index = i,
                    side = %order.side(),
                    limit = order.limit_price(),
                    rate,
                    "Order ineligible at implied rate"
                );
            }
            Ok(verdict)
        })
        .collect()
}
