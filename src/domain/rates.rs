//! Reference rate resolution.
//!
//! For every distinct (base, quote) pair in the batch the implied rate is
//! `price[quote] / price[base]`, i.e. how many quote units one base unit
//! is worth at the reference valuations. Rates are inputs to the
//! eligibility check, never decision variables.

use std::collections::BTreeMap;

use tracing::debug;

use super::error::MatchError;
use super::order::{Order, Token};
use super::prices::ReferencePrices;

/// Implied quote-per-base rate from two valuations.
pub fn implied_rate(base_price: f64, quote_price: f64) -> f64 {
    quote_price / base_price
}

/// Rates for every pair referenced by one batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImpliedRates {
    /// base → quote → rate
    rates: BTreeMap<Token, BTreeMap<Token, f64>>,
}

impl ImpliedRates {
    /// Resolve the rate of each distinct pair in `orders`.
    ///
    /// # Errors
    /// `MatchError::InvalidPrice` when a base or quote token has no
    /// positive finite reference price.
    pub fn resolve(orders: &[Order], prices: &ReferencePrices) -> Result<Self, MatchError> {
        let mut rates: BTreeMap<Token, BTreeMap<Token, f64>> = BTreeMap::new();

        for order in orders {
            let by_quote = rates.entry(order.base_token().to_string()).or_default();
            if by_quote.contains_key(order.quote_token()) {
                continue;
            }
            let base_price = prices.valuation(order.base_token())?;
            let quote_price = prices.valuation(order.quote_token())?;
            let rate = implied_rate(base_price, quote_price);
            debug!(
                base = order.base_token(),
                quote = order.quote_token(),
                rate,
                "Resolved implied rate"
            );
            by_quote.insert(order.quote_token().to_string(), rate);
        }

        Ok(Self { rates })
    }

    pub fn rate(&self, base: &str, quote: &str) -> Option<f64> {
        self.rates.get(base)?.get(quote).copied()
    }

    pub fn for_order(&self, order: &Order) -> Option<f64> {
        self.rate(order.base_token(), order.quote_token())
    }

    /// Number of distinct pairs.
    pub fn len(&self) -> usize {
        self.rates.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::PriceIssue;

    fn prices() -> ReferencePrices {
        [("BTC", 2.0), ("ETH", 8.0)].into_iter().collect()
    }

    #[test]
    fn test_implied_rate_is_quote_over_base() {
        assert_eq!(implied_rate(2.0, 8.0), 4.0);
        assert_eq!(implied_rate(8.0, 2.0), 0.25);
    }

    #[test]
    fn test_resolve_distinct_pairs() {
        let orders = vec![
            Order::buy("BTC", "ETH", 1.0, 5.0).unwrap(),
            Order::sell("BTC", "ETH", 1.0, 3.0).unwrap(),
            Order::buy("ETH", "BTC", 1.0, 0.3).unwrap(),
        ];
        let rates = ImpliedRates::resolve(&orders, &prices()).unwrap();
        assert_eq!(rates.len(), 2);
        assert_eq!(rates.rate("BTC", "ETH"), Some(4.0));
        assert_eq!(rates.rate("ETH", "BTC"), Some(0.25));
        assert_eq!(rates.for_order(&orders[1]), Some(4.0));
        assert_eq!(rates.rate("BTC", "USDT"), None);
    }

    #[test]
    fn test_resolve_missing_quote_price() {
        let orders = vec![Order::buy("BTC", "SOL", 1.0, 5.0).unwrap()];
        let err = ImpliedRates::resolve(&orders, &prices()).unwrap_err();
        assert!(matches!(
            err,
            MatchError::InvalidPrice { ref token, issue: PriceIssue::Missing } if token == "SOL"
        ));
    }

    #[test]
    fn test_resolve_negative_base_price() {
        let mut p = prices();
        p.insert("BTC", -1.0);
        let orders = vec![Order::sell("BTC", "ETH", 1.0, 5.0).unwrap()];
        assert!(ImpliedRates::resolve(&orders, &p).is_err());
    }

    #[test]
    fn test_resolve_empty_batch() {
        let rates = ImpliedRates::resolve(&[], &ReferencePrices::new()).unwrap();
        assert!(rates.is_empty());
    }
}
