//! # Message Handlers
//!
//! Routes each transaction message to the keeper that owns it.
//!
//! Two kinds of message reach the handlers:
//!
//! - **User messages** (market creation, param updates): authority-gated, a
//!   failure discards that transaction only.
//! - **Proposer-injected messages** (`UpdateMarketPrices`,
//!   `AcknowledgeBridges`): built by the proposer from its daemon caches;
//!   every validator re-validates them and a failure invalidates the block.

mod bridge;
mod prices;

use serde::{Deserialize, Serialize};
use shared_indexer::BlockContext;
use shared_types::Address;
use thiserror::Error;
use xc_01_prices::{MarketId, MarketParam, MarketPrice, MarketPriceUpdate, PricesError};
use xc_02_bridge::{BridgeError, BridgeEvent, EventParams, SafetyParams};

use crate::container::AppState;

/// A transaction message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Msg {
    /// Create a market with its initial price.
    CreateOracleMarket {
        /// Signer; must be an authority.
        authority: Address,
        /// Market params; `id` is assigned.
        param: MarketParam,
        /// Initial price.
        price: MarketPrice,
    },
    /// Replace the params of `param.id`.
    UpdateMarketParam {
        /// Signer; must be an authority.
        authority: Address,
        /// New params.
        param: MarketParam,
    },
    /// Proposer price update batch.
    UpdateMarketPrices {
        /// Candidate prices.
        updates: Vec<MarketPriceUpdate>,
    },
    /// Proposer bridge acknowledgement batch.
    AcknowledgeBridges {
        /// Consecutive observed events.
        events: Vec<BridgeEvent>,
    },
    /// Replace the bridge safety params.
    UpdateSafetyParams {
        /// Signer; must be an authority.
        authority: Address,
        /// New params.
        params: SafetyParams,
    },
    /// Replace the bridge event params.
    UpdateEventParams {
        /// Signer; must be an authority.
        authority: Address,
        /// New params.
        params: EventParams,
    },
}

impl Msg {
    /// Short name for logs and metric labels.
    pub fn type_name(&self) -> &'static str {
        match self {
            Msg::CreateOracleMarket { .. } => "create_oracle_market",
            Msg::UpdateMarketParam { .. } => "update_market_param",
            Msg::UpdateMarketPrices { .. } => "update_market_prices",
            Msg::AcknowledgeBridges { .. } => "acknowledge_bridges",
            Msg::UpdateSafetyParams { .. } => "update_safety_params",
            Msg::UpdateEventParams { .. } => "update_event_params",
        }
    }

    /// Built by the proposer rather than submitted by a user. A failure
    /// makes the whole block invalid.
    pub fn is_proposer_injected(&self) -> bool {
        matches!(
            self,
            Msg::UpdateMarketPrices { .. } | Msg::AcknowledgeBridges { .. }
        )
    }
}

/// Successful handler result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MsgResponse {
    /// Id of the new market.
    MarketCreated(MarketId),
    /// Params as stored.
    MarketParamUpdated(MarketParam),
    /// Prices that cleared the change threshold.
    PricesUpdated(Vec<MarketPrice>),
    /// Number of events acknowledged.
    BridgesAcknowledged(usize),
    /// Params replaced.
    ParamsUpdated,
}

/// Handler errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// Oracle prices rejected the message.
    #[error("prices: {0}")]
    Prices(#[from] PricesError),

    /// Bridge rejected the message.
    #[error("bridge: {0}")]
    Bridge(#[from] BridgeError),
}

/// Execute `msg` against `state`, recording events into `ctx`.
pub fn dispatch(
    state: &mut AppState,
    ctx: &mut BlockContext,
    msg: Msg,
) -> Result<MsgResponse, HandlerError> {
    match msg {
        Msg::CreateOracleMarket {
            authority,
            param,
            price,
        } => prices::handle_create_oracle_market(state, ctx, &authority, param, price),
        Msg::UpdateMarketParam { authority, param } => {
            prices::handle_update_market_param(state, ctx, &authority, param)
        }
        Msg::UpdateMarketPrices { updates } => {
            prices::handle_update_market_prices(state, ctx, &updates)
        }
        Msg::AcknowledgeBridges { events } => {
            bridge::handle_acknowledge_bridges(state, ctx, &events)
        }
        Msg::UpdateSafetyParams { authority, params } => {
            bridge::handle_update_safety_params(state, &authority, params)
        }
        Msg::UpdateEventParams { authority, params } => {
            bridge::handle_update_event_params(state, &authority, params)
        }
    }
}
