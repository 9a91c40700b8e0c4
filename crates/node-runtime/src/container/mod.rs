//! # Application Container
//!
//! The consensus state of the node (the keepers) plus the per-validator
//! ingestion caches the daemons feed.
//!
//! `AppState` is plain owned data: the block driver branches it by cloning
//! and commits by swapping the branch in.

pub mod config;

pub use config::{
    AppOptions, BridgeConfig, BridgeFlags, ClobFlags, ConfigError, EnvOptions, LiquidationFlags,
    NodeConfig, PriceFlags, PricesConfig, SharedFlags,
};

use shared_indexer::IndexerEventManager;
use shared_types::AuthoritySet;
use std::sync::Arc;
use xc_01_prices::{ExchangeMarketPriceCache, MarketPriceKeeper};
use xc_02_bridge::{BridgeKeeper, EventParams, InMemoryBank, RecognizedEventCache, SafetyParams};

/// Consensus state: every keeper the block driver mutates.
#[derive(Clone)]
pub struct AppState {
    /// Oracle price keeper.
    pub prices: MarketPriceKeeper,
    /// Bridge keeper over the in-memory ledger.
    pub bridge: BridgeKeeper<InMemoryBank>,
}

impl AppState {
    /// Fresh state with default bridge params and an empty ledger.
    pub fn new(config: &NodeConfig, indexer: IndexerEventManager) -> Self {
        Self::with_bridge_params(
            config,
            indexer,
            SafetyParams::default(),
            EventParams::default(),
        )
    }

    /// Fresh state with explicit bridge params.
    pub fn with_bridge_params(
        config: &NodeConfig,
        indexer: IndexerEventManager,
        safety_params: SafetyParams,
        event_params: EventParams,
    ) -> Self {
        let authorities = AuthoritySet::new(config.authorities.iter().copied());
        Self {
            prices: MarketPriceKeeper::new(
                config.prices.keeper_config(),
                authorities.clone(),
                indexer.clone(),
            ),
            bridge: BridgeKeeper::new(
                safety_params,
                event_params,
                InMemoryBank::new(),
                authorities,
                indexer,
            ),
        }
    }
}

/// Ingestion caches shared between daemons and the proposer.
#[derive(Clone)]
pub struct DaemonCaches {
    /// Latest exchange prices per market.
    pub prices: Arc<ExchangeMarketPriceCache>,
    /// Observed bridge events awaiting acknowledgement.
    pub bridge_events: Arc<RecognizedEventCache>,
}

impl DaemonCaches {
    /// Caches sized and rate limited from `config`.
    pub fn new(config: &NodeConfig) -> Self {
        Self {
            prices: Arc::new(ExchangeMarketPriceCache::new(
                config.prices.max_price_age_ms,
                config.prices.ingest_burst,
                config.prices.ingest_rate_per_sec,
            )),
            bridge_events: Arc::new(RecognizedEventCache::new(
                config.prices.ingest_burst,
                config.prices.ingest_rate_per_sec,
            )),
        }
    }
}
