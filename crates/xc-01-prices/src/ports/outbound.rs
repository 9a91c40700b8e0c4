//! # Outbound Ports
//!
//! Source of per-exchange prices for the proposer's candidate computation.

use crate::domain::MarketId;

/// Per-validator price source - outbound port.
///
/// Implemented by the daemon-fed exchange price cache and by test fakes.
pub trait IndexPriceSource: Send + Sync {
    /// Prices for `market_id` reported no earlier than `now_ms - max_age`,
    /// one per exchange.
    fn fresh_prices(&self, market_id: MarketId, now_ms: u64) -> Vec<u64>;
}

/// Fixed price table for tests.
#[derive(Clone, Debug, Default)]
pub struct MockPriceSource {
    prices: std::collections::BTreeMap<MarketId, Vec<u64>>,
}

impl MockPriceSource {
    /// Empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the prices returned for a market.
    pub fn with_prices(mut self, market_id: MarketId, prices: Vec<u64>) -> Self {
        self.prices.insert(market_id, prices);
        self
    }
}

impl IndexPriceSource for MockPriceSource {
    fn fresh_prices(&self, market_id: MarketId, _now_ms: u64) -> Vec<u64> {
        self.prices.get(&market_id).cloned().unwrap_or_default()
    }
}
