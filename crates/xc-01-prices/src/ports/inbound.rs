//! # Inbound Ports
//!
//! API trait defining what the Oracle Prices subsystem can do.

use crate::domain::{
    MarketId, MarketParam, MarketParamPrice, MarketPrice, MarketPriceUpdate, PricesError,
};
use shared_indexer::BlockContext;
use shared_types::Address;

/// Oracle prices API - inbound port.
///
/// Mutations run inside block execution and record their events into the
/// block context's log.
pub trait MarketPricesApi {
    /// Create a market with its initial price. Returns the assigned id.
    fn create_market(
        &mut self,
        ctx: &mut BlockContext,
        param: MarketParam,
        price: MarketPrice,
    ) -> Result<MarketId, PricesError>;

    /// Replace the params of market `id`. Authority-gated.
    fn update_market_param(
        &mut self,
        ctx: &mut BlockContext,
        caller: &Address,
        id: MarketId,
        param: MarketParam,
    ) -> Result<MarketParam, PricesError>;

    /// Apply a per-block batch of candidate prices. Returns the prices written.
    fn update_market_prices(
        &mut self,
        ctx: &mut BlockContext,
        updates: &[MarketPriceUpdate],
    ) -> Result<Vec<MarketPrice>, PricesError>;

    /// Current price of a market.
    fn get_market_price(&self, id: MarketId) -> Result<MarketPrice, PricesError>;

    /// Params of a market.
    fn get_market_param(&self, id: MarketId) -> Result<MarketParam, PricesError>;

    /// All markets with their prices, ordered by id.
    fn get_all_market_param_prices(&self) -> Vec<MarketParamPrice>;

    /// Smoothed reference price of a market.
    fn get_smoothed_price(&self, id: MarketId) -> Result<u64, PricesError>;
}
