//! Order model for the cross-token batch auction.
//!
//! An `Order` is validated once at construction and never mutated
//! afterwards. The matching core only reads the pair, side, quantity
//! and limit price; `OrderMeta` travels along untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ────────────────────────────────────────────
// Type aliases
// ────────────────────────────────────────────

/// Token symbol, e.g. `"BTC"`.
pub type Token = String;

// ────────────────────────────────────────────
// Side
// ────────────────────────────────────────────

/// Whether the order buys or sells its base token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

impl std::str::FromStr for Side {
    type Err = OrderError;

    /// Parses the textual actions order sources emit (`buy` / `sell`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("buy") {
            Ok(Self::Buy)
        } else if s.eq_ignore_ascii_case("sell") {
            Ok(Self::Sell)
        } else {
            Err(OrderError::UnknownSide(s.to_string()))
        }
    }
}

// ────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────

/// Reasons an order is rejected at construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrderError {
    #[error("quantity must be positive and finite, got {0}")]
    InvalidQuantity(f64),

    #[error("limit price must be positive and finite, got {0}")]
    InvalidLimitPrice(f64),

    #[error("base and quote token are both {0}")]
    SameToken(Token),

    #[error("token symbol is empty")]
    EmptyToken,

    #[error("unknown order action {0:?} (expected buy or sell)")]
    UnknownSide(String),
}

// ────────────────────────────────────────────
// Metadata
// ────────────────────────────────────────────

/// Opaque identifiers carried with an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderMeta {
    /// When the order was placed, if the source knows.
    pub timestamp: Option<DateTime<Utc>>,
    /// Address the order's funds were deposited from.
    pub deposit_address: Option<String>,
    /// Address that receives the executed tokens.
    pub wallet_address: Option<String>,
}

// ────────────────────────────────────────────
// Order
// ────────────────────────────────────────────

/// A validated limit order.
///
/// `quantity` is in base-token units, `limit_price` in quote-per-base
/// units. A buy caps the rate it accepts, a sell floors it.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    base_token: Token,
    quote_token: Token,
    side: Side,
    quantity: f64,
    limit_price: f64,
    meta: OrderMeta,
}

impl Order {
    /// Build an order, rejecting non-positive or non-finite quantity and
    /// limit price, empty symbols, and identical base/quote tokens.
    pub fn new(
        base_token: impl Into<Token>,
        quote_token: impl Into<Token>,
        side: Side,
        quantity: f64,
        limit_price: f64,
    ) -> Result<Self, OrderError> {
        let base_token = base_token.into();
        let quote_token = quote_token.into();

        if base_token.is_empty() || quote_token.is_empty() {
            return Err(OrderError::EmptyToken);
        }
        if base_token == quote_token {
            return Err(OrderError::SameToken(base_token));
        }
        if !(quantity.is_finite() && quantity > 0.0) {
            return Err(OrderError::InvalidQuantity(quantity));
        }
        if !(limit_price.is_finite() && limit_price > 0.0) {
            return Err(OrderError::InvalidLimitPrice(limit_price));
        }

        Ok(Self {
            base_token,
            quote_token,
            side,
            quantity,
            limit_price,
            meta: OrderMeta::default(),
        })
    }

    /// Shorthand for a buy order.
    pub fn buy(
        base_token: impl Into<Token>,
        quote_token: impl Into<Token>,
        quantity: f64,
        limit_price: f64,
    ) -> Result<Self, OrderError> {
        Self::new(base_token, quote_token, Side::Buy, quantity, limit_price)
    }

    /// Shorthand for a sell order.
    pub fn sell(
        base_token: impl Into<Token>,
        quote_token: impl Into<Token>,
        quantity: f64,
        limit_price: f64,
    ) -> Result<Self, OrderError> {
        Self::new(base_token, quote_token, Side::Sell, quantity, limit_price)
    }

    /// Attach opaque identifiers.
    #[must_use]
    pub fn with_meta(mut self, meta: OrderMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn base_token(&self) -> &str {
        &self.base_token
    }

    pub fn quote_token(&self) -> &str {
        &self.quote_token
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    pub fn limit_price(&self) -> f64 {
        self.limit_price
    }

    pub fn meta(&self) -> &OrderMeta {
        &self.meta
    }

    pub fn is_buy(&self) -> bool {
        self.side == Side::Buy
    }
}

impl std::fmt::Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {}/{} @ {}",
            self.side, self.quantity, self.base_token, self.quote_token, self.limit_price
        )
    }
}
