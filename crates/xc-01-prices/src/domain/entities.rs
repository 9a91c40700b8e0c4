//! # Domain Entities
//!
//! Market parameters and canonical prices.

use serde::{Deserialize, Serialize};

/// Sequentially assigned market identifier.
pub type MarketId = u32;

/// Default number of accepted prices kept per market for smoothing.
pub const SMOOTHED_PRICE_HISTORY_LENGTH: usize = 5;

/// Governance-controlled market parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketParam {
    /// Market id, assigned by `create_market`.
    pub id: MarketId,
    /// Human-readable pair, e.g. `BTC-USD`.
    pub pair: String,
    /// Power-of-ten scale: real price = price * 10^exponent.
    pub exponent: i32,
    /// Minimum number of exchanges reporting before an index price exists.
    pub min_exchanges: u32,
    /// Minimum relative change, in ppm, for an update to be accepted.
    pub min_price_change_ppm: u32,
    /// Per-exchange query configuration consumed by the price daemon.
    pub exchange_config_json: String,
}

/// Canonical on-chain price of a market.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketPrice {
    /// Id of the market this price belongs to.
    pub id: MarketId,
    /// Must equal the market param exponent.
    pub exponent: i32,
    /// Scaled integer price.
    pub price: u64,
}

/// A market's param together with its current price.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketParamPrice {
    /// Market parameters.
    pub param: MarketParam,
    /// Current price.
    pub price: MarketPrice,
}

/// Candidate price for one market inside a per-block update batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketPriceUpdate {
    /// Target market.
    pub market_id: MarketId,
    /// New scaled price, in the market's exponent.
    pub price: u64,
}

impl MarketPriceUpdate {
    /// Create an update.
    pub fn new(market_id: MarketId, price: u64) -> Self {
        Self { market_id, price }
    }
}

/// Keeper configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PricesConfig {
    /// Ring buffer length of the smoothed price tracker (>= 1).
    pub smoothed_history_length: usize,
}

impl Default for PricesConfig {
    fn default() -> Self {
        Self {
            smoothed_history_length: SMOOTHED_PRICE_HISTORY_LENGTH,
        }
    }
}
