//! # Exchange Market Price Cache
//!
//! Per-validator store of the latest price each exchange reported for each
//! market. Fed by price daemons, read by the proposer. Never part of chain
//! state: every candidate drawn from it is re-validated by
//! `update_market_prices` on every validator.

use crate::domain::{IngestError, MarketId};
use crate::ports::IndexPriceSource;
use parking_lot::RwLock;
use shared_types::RateLimiter;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

/// Result of a daemon push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Price stored as the exchange's latest.
    Accepted,
    /// Not newer than what is already stored; ignored.
    Stale,
}

#[derive(Debug, Clone, Copy)]
struct ExchangePrice {
    price: u64,
    timestamp_ms: u64,
}

/// Thread-safe exchange price cache.
pub struct ExchangeMarketPriceCache {
    max_price_age_ms: u64,
    prices: RwLock<HashMap<MarketId, BTreeMap<String, ExchangePrice>>>,
    rate_limiter: RateLimiter,
}

impl ExchangeMarketPriceCache {
    /// Create a cache.
    ///
    /// - `max_price_age_ms`: prices older than this are not fresh
    /// - `burst` / `rate_per_sec`: token bucket guarding pushes
    pub fn new(max_price_age_ms: u64, burst: u64, rate_per_sec: u64) -> Self {
        Self {
            max_price_age_ms,
            prices: RwLock::new(HashMap::new()),
            rate_limiter: RateLimiter::new(burst, rate_per_sec),
        }
    }

    /// Record a price reported by `exchange`.
    ///
    /// Idempotent: re-pushing the same or an older timestamp is `Stale`.
    pub fn push(
        &self,
        market_id: MarketId,
        exchange: &str,
        price: u64,
        timestamp_ms: u64,
    ) -> Result<IngestOutcome, IngestError> {
        if !self.rate_limiter.try_acquire() {
            warn!("[xc-01] price ingestion rate limited ({} from {})", market_id, exchange);
            return Err(IngestError::RateLimited);
        }
        if price == 0 {
            return Err(IngestError::InvalidPrice {
                market_id,
                exchange: exchange.to_string(),
            });
        }

        let mut prices = self.prices.write();
        let exchanges = prices.entry(market_id).or_default();
        if let Some(existing) = exchanges.get(exchange) {
            if timestamp_ms <= existing.timestamp_ms {
                return Ok(IngestOutcome::Stale);
            }
        }
        exchanges.insert(
            exchange.to_string(),
            ExchangePrice {
                price,
                timestamp_ms,
            },
        );
        debug!(
            market_id,
            exchange,
            price,
            timestamp_ms,
            "[xc-01] exchange price cached"
        );
        Ok(IngestOutcome::Accepted)
    }

    /// Drop entries older than the max age. Returns how many were removed.
    pub fn prune(&self, now_ms: u64) -> usize {
        let mut prices = self.prices.write();
        let mut removed = 0;
        for exchanges in prices.values_mut() {
            let before = exchanges.len();
            exchanges.retain(|_, p| !self.is_expired(p, now_ms));
            removed += before - exchanges.len();
        }
        prices.retain(|_, exchanges| !exchanges.is_empty());
        removed
    }

    /// Number of (market, exchange) entries held.
    pub fn len(&self) -> usize {
        self.prices.read().values().map(BTreeMap::len).sum()
    }

    /// True if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Configured max age.
    pub fn max_price_age_ms(&self) -> u64 {
        self.max_price_age_ms
    }

    fn is_expired(&self, price: &ExchangePrice, now_ms: u64) -> bool {
        now_ms.saturating_sub(price.timestamp_ms) > self.max_price_age_ms
    }
}

impl IndexPriceSource for ExchangeMarketPriceCache {
    fn fresh_prices(&self, market_id: MarketId, now_ms: u64) -> Vec<u64> {
        self.prices
            .read()
            .get(&market_id)
            .map(|exchanges| {
                exchanges
                    .values()
                    .filter(|p| !self.is_expired(p, now_ms))
                    .map(|p| p.price)
                    .collect()
            })
            .unwrap_or_default()
    }
}
