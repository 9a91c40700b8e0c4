//! # Market Price Keeper
//!
//! Owns market params, canonical prices and the smoothed price tracker.
//!
//! The keeper holds no locks: the lifecycle driver owns it and calls it with
//! `&mut self` inside block execution. Cloning produces an independent
//! branch for transactional execution.

mod market;
mod prices;


use crate::domain::{
    MarketId, MarketParam, MarketParamPrice, MarketPrice, MarketPriceUpdate,
    MarketToSmoothedPrices, PricesConfig, PricesError,
};
use crate::events::{MarketEvent, MARKET_EVENT_VERSION};
use crate::ports::MarketPricesApi;
use shared_indexer::{BlockContext, IndexerEventManager, SUBTYPE_MARKET};
use shared_types::{Address, AuthoritySet};
use std::collections::BTreeMap;

/// Market price keeper.
#[derive(Clone)]
pub struct MarketPriceKeeper {
    params: BTreeMap<MarketId, MarketParam>,
    prices: BTreeMap<MarketId, MarketPrice>,
    next_market_id: MarketId,
    smoothed: MarketToSmoothedPrices,
    authorities: AuthoritySet,
    indexer: IndexerEventManager,
}

impl MarketPriceKeeper {
    /// Create an empty keeper.
    pub fn new(config: PricesConfig, authorities: AuthoritySet, indexer: IndexerEventManager) -> Self {
        Self {
            params: BTreeMap::new(),
            prices: BTreeMap::new(),
            next_market_id: 0,
            smoothed: MarketToSmoothedPrices::new(config.smoothed_history_length),
            authorities,
            indexer,
        }
    }

    /// Number of markets.
    pub fn market_count(&self) -> usize {
        self.params.len()
    }

    /// Id the next created market will receive.
    pub fn next_market_id(&self) -> MarketId {
        self.next_market_id
    }

    /// Smoothed price tracker, read-only.
    pub fn smoothed_prices(&self) -> &MarketToSmoothedPrices {
        &self.smoothed
    }

    /// Authorities allowed to modify market params.
    pub fn authorities(&self) -> &AuthoritySet {
        &self.authorities
    }

    fn emit(&self, ctx: &mut BlockContext, event: &MarketEvent) -> Result<(), PricesError> {
        self.indexer
            .add_txn_event(ctx, SUBTYPE_MARKET, MARKET_EVENT_VERSION, event)?;
        Ok(())
    }
}

impl MarketPricesApi for MarketPriceKeeper {
    fn create_market(
        &mut self,
        ctx: &mut BlockContext,
        param: MarketParam,
        price: MarketPrice,
    ) -> Result<MarketId, PricesError> {
        self.create_market_internal(ctx, param, price)
    }

    fn update_market_param(
        &mut self,
        ctx: &mut BlockContext,
        caller: &Address,
        id: MarketId,
        param: MarketParam,
    ) -> Result<MarketParam, PricesError> {
        self.update_market_param_internal(ctx, caller, id, param)
    }

    fn update_market_prices(
        &mut self,
        ctx: &mut BlockContext,
        updates: &[MarketPriceUpdate],
    ) -> Result<Vec<MarketPrice>, PricesError> {
        self.update_market_prices_internal(ctx, updates)
    }

    fn get_market_price(&self, id: MarketId) -> Result<MarketPrice, PricesError> {
        self.prices
            .get(&id)
            .cloned()
            .ok_or(PricesError::MarketNotFound(id))
    }

    fn get_market_param(&self, id: MarketId) -> Result<MarketParam, PricesError> {
        self.params
            .get(&id)
            .cloned()
            .ok_or(PricesError::MarketNotFound(id))
    }

    fn get_all_market_param_prices(&self) -> Vec<MarketParamPrice> {
        self.params
            .values()
            .filter_map(|param| {
                self.prices.get(&param.id).map(|price| MarketParamPrice {
                    param: param.clone(),
                    price: price.clone(),
                })
            })
            .collect()
    }

    fn get_smoothed_price(&self, id: MarketId) -> Result<u64, PricesError> {
        if !self.params.contains_key(&id) {
            return Err(PricesError::MarketNotFound(id));
        }
        self.smoothed
            .get_smoothed_price(id)
            .ok_or(PricesError::MarketNotFound(id))
    }
}
