//! # Genesis Builder
//!
//! Applies a `GenesisConfig` to a fresh `AppState`.

use serde::{Deserialize, Serialize};
use shared_indexer::{BlockContext, IndexerBlock, IndexerEventManager};
use shared_types::Coin;
use thiserror::Error;
use tracing::info;
use xc_01_prices::{MarketParam, MarketPrice, MarketPricesApi, PricesError};
use xc_02_bridge::{BankError, BankKeeper, BridgeKeeper, EventParams, InMemoryBank, SafetyParams};

use crate::container::{AppState, NodeConfig};

/// Genesis errors.
#[derive(Debug, Error)]
pub enum GenesisError {
    /// Genesis file could not be parsed.
    #[error("Invalid genesis configuration: {0}")]
    InvalidConfig(String),

    /// A genesis market was rejected.
    #[error("Failed to create genesis market {pair}: {source}")]
    Market {
        /// Pair of the rejected market.
        pair: String,
        /// Keeper error.
        source: PricesError,
    },

    /// Custodial account could not be funded.
    #[error("Failed to fund custodial account: {0}")]
    Funding(#[from] BankError),
}

/// One market created at genesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisMarket {
    /// Params; `id` is ignored and assigned sequentially.
    pub param: MarketParam,
    /// Initial price.
    pub price: u64,
}

/// Genesis configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisConfig {
    /// Genesis time (unix milliseconds).
    pub genesis_time_ms: u64,
    /// Markets in creation order.
    pub markets: Vec<GenesisMarket>,
    /// Bridge kill switch and delay.
    pub safety_params: SafetyParams,
    /// Bridge token and external contract.
    pub event_params: EventParams,
    /// Initial balance of the custodial bridge account, in the bridge denom.
    pub custodial_balance: i128,
}

impl Default for GenesisConfig {
    fn default() -> Self {
        Self {
            genesis_time_ms: 0,
            markets: vec![
                genesis_market("BTC-USD", -5, 2_000_000_000),
                genesis_market("ETH-USD", -6, 1_500_000_000),
            ],
            safety_params: SafetyParams::default(),
            event_params: EventParams::default(),
            custodial_balance: 1_000_000_000_000,
        }
    }
}

impl GenesisConfig {
    /// Local development: short bridge delay.
    pub fn devnet() -> Self {
        Self {
            safety_params: SafetyParams {
                is_disabled: false,
                delay_blocks: 5,
            },
            ..Self::default()
        }
    }

    /// Parse a JSON genesis document.
    pub fn from_json(raw: &str) -> Result<Self, GenesisError> {
        serde_json::from_str(raw).map_err(|e| GenesisError::InvalidConfig(e.to_string()))
    }
}

fn genesis_market(pair: &str, exponent: i32, price: u64) -> GenesisMarket {
    GenesisMarket {
        param: MarketParam {
            id: 0,
            pair: pair.to_string(),
            exponent,
            min_exchanges: 2,
            min_price_change_ppm: 1_000,
            exchange_config_json: r#"{"exchanges":["alpha","beta","gamma"]}"#.to_string(),
        },
        price,
    }
}

/// Initialized chain.
pub struct Genesis {
    /// State at height 0.
    pub state: AppState,
    /// Events recorded while applying genesis.
    pub block: IndexerBlock,
}

/// Builds the height-0 state.
pub struct GenesisBuilder {
    config: GenesisConfig,
}

impl GenesisBuilder {
    /// Create a builder.
    pub fn new(config: GenesisConfig) -> Self {
        Self { config }
    }

    /// Apply genesis. The returned batch has not been sent.
    pub fn build(
        self,
        node_config: &NodeConfig,
        indexer: IndexerEventManager,
    ) -> Result<Genesis, GenesisError> {
        let GenesisConfig {
            genesis_time_ms,
            markets,
            safety_params,
            event_params,
            custodial_balance,
        } = self.config;

        let denom = event_params.denom.clone();
        let mut state = AppState::with_bridge_params(
            node_config,
            indexer.clone(),
            safety_params,
            event_params,
        );

        if custodial_balance != 0 {
            state.bridge.bank_mut().mint_to(
                &BridgeKeeper::<InMemoryBank>::custodial_address(),
                &Coin::new(denom.clone(), custodial_balance),
            )?;
        }

        let mut ctx = BlockContext::new(0, genesis_time_ms);
        for market in markets {
            let pair = market.param.pair.clone();
            let price = MarketPrice {
                id: 0,
                exponent: market.param.exponent,
                price: market.price,
            };
            state
                .prices
                .create_market(&mut ctx, market.param, price)
                .map_err(|source| GenesisError::Market { pair, source })?;
        }

        info!(
            markets = state.prices.market_count(),
            custodial_balance,
            denom = %denom,
            "[runtime] genesis applied"
        );

        let block = indexer.produce_block(&ctx);
        Ok(Genesis { state, block })
    }
}
