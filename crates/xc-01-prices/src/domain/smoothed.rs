//! # Smoothed Price Tracker
//!
//! Bounded per-market history of accepted on-chain prices. The derived
//! reference price is the lower median of the buffer, so it is always a
//! price that was actually observed.

use super::entities::MarketId;
use crate::algorithms::median;
use std::collections::{BTreeMap, VecDeque};

/// Fixed-capacity ring buffer of accepted prices, oldest first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PriceHistory {
    capacity: usize,
    prices: VecDeque<u64>,
}

impl PriceHistory {
    /// Empty history. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            prices: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a price, evicting the oldest entry when full.
    pub fn push(&mut self, price: u64) {
        if self.prices.len() == self.capacity {
            self.prices.pop_front();
        }
        self.prices.push_back(price);
    }

    /// Lower median of the buffer, `None` while empty.
    pub fn smoothed(&self) -> Option<u64> {
        let prices: Vec<u64> = self.prices.iter().copied().collect();
        median(&prices)
    }

    /// Prices oldest first.
    pub fn prices(&self) -> impl Iterator<Item = &u64> {
        self.prices.iter()
    }

    /// Current number of entries.
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// True if nothing has been pushed yet.
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Smoothed price histories keyed by market id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarketToSmoothedPrices {
    history_length: usize,
    markets: BTreeMap<MarketId, PriceHistory>,
}

impl MarketToSmoothedPrices {
    /// Tracker whose per-market buffers hold `history_length` prices.
    pub fn new(history_length: usize) -> Self {
        Self {
            history_length: history_length.max(1),
            markets: BTreeMap::new(),
        }
    }

    /// Record an accepted price for `market_id`.
    pub fn push(&mut self, market_id: MarketId, price: u64) {
        let history_length = self.history_length;
        self.markets
            .entry(market_id)
            .or_insert_with(|| PriceHistory::new(history_length))
            .push(price);
    }

    /// Derived reference price, `None` for an unknown or empty market.
    pub fn get_smoothed_price(&self, market_id: MarketId) -> Option<u64> {
        self.markets.get(&market_id).and_then(PriceHistory::smoothed)
    }

    /// History of a single market.
    pub fn history(&self, market_id: MarketId) -> Option<&PriceHistory> {
        self.markets.get(&market_id)
    }

    /// Configured buffer length.
    pub fn history_length(&self) -> usize {
        self.history_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_buffer_evicts_oldest() {
        let mut history = PriceHistory::new(3);
        for p in [10, 20, 30, 40] {
            history.push(p);
        }
        assert_eq!(history.len(), 3);
        let prices: Vec<u64> = history.prices().copied().collect();
        assert_eq!(prices, vec![20, 30, 40]);
    }

    #[test]
    fn test_never_exceeds_capacity() {
        let mut history = PriceHistory::new(5);
        for p in 0..100 {
            history.push(p);
            assert!(history.len() <= history.capacity());
        }
    }

    #[test]
    fn test_zero_capacity_raised_to_one() {
        let mut history = PriceHistory::new(0);
        history.push(7);
        history.push(8);
        assert_eq!(history.capacity(), 1);
        assert_eq!(history.smoothed(), Some(8));
    }

    #[test]
    fn test_smoothed_is_lower_median() {
        let mut history = PriceHistory::new(4);
        for p in [40, 10, 30, 20] {
            history.push(p);
        }
        assert_eq!(history.smoothed(), Some(20));
    }

    #[test]
    fn test_smoothed_ignores_outlier() {
        let mut history = PriceHistory::new(5);
        for p in [100, 101, 1_000_000, 99, 100] {
            history.push(p);
        }
        assert_eq!(history.smoothed(), Some(100));
    }

    #[test]
    fn test_market_tracker() {
        let mut tracker = MarketToSmoothedPrices::new(2);
        assert_eq!(tracker.get_smoothed_price(0), None);
        tracker.push(0, 5);
        tracker.push(0, 9);
        tracker.push(0, 7);
        assert_eq!(tracker.get_smoothed_price(0), Some(7));
        assert_eq!(tracker.history(0).map(PriceHistory::len), Some(2));
        assert_eq!(tracker.get_smoothed_price(1), None);
    }
}
