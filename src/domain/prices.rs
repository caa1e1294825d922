//! Reference price snapshot.
//!
//! Valuations of each token in one common currency (e.g. USDT). The
//! snapshot is read-only for the duration of a matching call.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::{MatchError, PriceIssue};
use super::order::Token;

/// Token symbol → common-currency valuation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferencePrices {
    prices: BTreeMap<Token, f64>,
}

impl ReferencePrices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a valuation. Values are checked when used.
    pub fn insert(&mut self, token: impl Into<Token>, price: f64) -> Option<f64> {
        self.prices.insert(token.into(), price)
    }

    /// Raw lookup, no validation.
    pub fn get(&self, token: &str) -> Option<f64> {
        self.prices.get(token).copied()
    }

    /// Validated lookup: the price must exist and be positive and finite.
    pub fn valuation(&self, token: &str) -> Result<f64, MatchError> {
        match self.get(token) {
            None => Err(MatchError::InvalidPrice {
                token: token.to_string(),
                issue: PriceIssue::Missing,
            }),
            Some(p) if !(p.is_finite() && p > 0.0) => Err(MatchError::InvalidPrice {
                token: token.to_string(),
                issue: PriceIssue::NotPositive(p),
            }),
            Some(p) => Ok(p),
        }
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.prices.iter().map(|(t, p)| (t.as_str(), *p))
    }
}

impl<T: Into<Token>> FromIterator<(T, f64)> for ReferencePrices {
    fn from_iter<I: IntoIterator<Item = (T, f64)>>(iter: I) -> Self {
        Self {
            prices: iter.into_iter().map(|(t, p)| (t.into(), p)).collect(),
        }
    }
}
