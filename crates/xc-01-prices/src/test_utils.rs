//! # Test Utilities
//!
//! Fixtures for keeper tests in this crate and in the integration suite.

use crate::domain::{MarketId, MarketParam, MarketPrice, PricesConfig};
use crate::ports::MarketPricesApi;
use crate::service::MarketPriceKeeper;
use shared_indexer::{BlockContext, IndexerEventManager, InMemoryIndexerSender};
use shared_types::{module_address, Address, AuthoritySet};
use std::sync::Arc;

/// Governance authority used by fixtures.
pub fn gov_authority() -> Address {
    module_address("gov")
}

/// Market param with `min_exchanges = 1` and an empty exchange config.
pub fn market_param(pair: &str, exponent: i32, min_price_change_ppm: u32) -> MarketParam {
    MarketParam {
        id: 0,
        pair: pair.to_string(),
        exponent,
        min_exchanges: 1,
        min_price_change_ppm,
        exchange_config_json: "{}".to_string(),
    }
}

/// Price in the given exponent.
pub fn market_price(exponent: i32, price: u64) -> MarketPrice {
    MarketPrice {
        id: 0,
        exponent,
        price,
    }
}

/// Keeper with the gov authority and an in-memory indexer sender.
pub fn create_test_keeper() -> (MarketPriceKeeper, Arc<InMemoryIndexerSender>) {
    create_test_keeper_with_config(PricesConfig::default())
}

/// Keeper with an explicit config.
pub fn create_test_keeper_with_config(
    config: PricesConfig,
) -> (MarketPriceKeeper, Arc<InMemoryIndexerSender>) {
    let sender = Arc::new(InMemoryIndexerSender::new());
    let indexer = IndexerEventManager::new(sender.clone());
    let keeper = MarketPriceKeeper::new(config, AuthoritySet::new([gov_authority()]), indexer);
    (keeper, sender)
}

/// Create `n` markets `MKT0-USD`, `MKT1-USD`, ... with exponent -5, a 50 ppm
/// threshold and initial price `1_000_000 * (i + 1)`.
pub fn create_n_markets(
    keeper: &mut MarketPriceKeeper,
    ctx: &mut BlockContext,
    n: u32,
) -> Vec<MarketId> {
    (0..n)
        .map(|i| {
            keeper
                .create_market(
                    ctx,
                    market_param(&format!("MKT{}-USD", i), -5, 50),
                    market_price(-5, 1_000_000 * u64::from(i + 1)),
                )
                .unwrap_or_else(|e| panic!("fixture market {} failed: {}", i, e))
        })
        .collect()
}
