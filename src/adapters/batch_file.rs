//! Batch Files — JSON Order Source
//!
//! Reads one batch (orders + reference prices) from a JSON document:
//!
//! ```json
//! {
//!   "prices": { "BTC": 2.0, "ETH": 4.0 },
//!   "orders": [
//!     { "base_token": "BTC", "quote_token": "ETH", "action": "buy",
//!       "quantity": 8, "limit_price": 3 }
//!   ]
//! }
//! ```
//!
//! Every order is validated while loading; the first malformed one
//! aborts the load and names its position.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

use crate::domain::error::MatchError;
use crate::domain::order::{Order, OrderError, OrderMeta, Side};
use crate::domain::prices::ReferencePrices;

/// One order as written in a batch file.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderRecord {
    pub base_token: String,
    pub quote_token: String,
    /// `"buy"` or `"sell"`, case-insensitive.
    pub action: String,
    pub quantity: f64,
    pub limit_price: f64,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deposit_address: Option<String>,
    #[serde(default)]
    pub wallet_address: Option<String>,
}

impl OrderRecord {
    /// Validate into a domain order.
    pub fn into_order(self) -> Result<Order, OrderError> {
        let side: Side = self.action.parse()?;
        let meta = OrderMeta {
            timestamp: self.timestamp,
            deposit_address: self.deposit_address,
            wallet_address: self.wallet_address,
        };
        Ok(Order::new(self.base_token, self.quote_token, side, self.quantity, self.limit_price)?
            .with_meta(meta))
    }
}

#[derive(Debug, Deserialize)]
struct BatchDocument {
    prices: ReferencePrices,
    orders: Vec<OrderRecord>,
}

/// A validated batch ready for matching.
#[derive(Debug, Clone)]
pub struct Batch {
    /// Where the batch came from (file path or caller label).
    pub source: String,
    pub orders: Vec<Order>,
    pub prices: ReferencePrices,
}

/// Parse a batch from a JSON string.
///
/// # Errors
/// Returns error if the JSON is malformed or any order fails validation.
pub fn parse_batch(source: &str, json: &str) -> Result<Batch> {
    let document: BatchDocument = serde_json::from_str(json)
        .with_context(|| format!("Failed to parse batch {source}"))?;

    let orders = document
        .orders
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            record
                .into_order()
                .map_err(|err| MatchError::InvalidOrder { index, source: err })
        })
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Rejected batch {source}"))?;

    Ok(Batch {
        source: source.to_string(),
        orders,
        prices: document.prices,
    })
}

/// Load and validate a batch file.
///
/// # Errors
/// Returns error if the file can't be read or fails `parse_batch`.
pub fn load_batch(path: &str) -> Result<Batch> {
    let content = std::fs::read_to_string(Path::new(path))
        .with_context(|| format!("Failed to read batch file: {path}"))?;

    let batch = parse_batch(path, &content)?;

    info!(
        source = %batch.source,
        orders = batch.orders.len(),
        tokens = batch.prices.len(),
        "Batch loaded"
    );

    Ok(batch)
}
