//! Oracle price message handlers.

use shared_indexer::BlockContext;
use shared_types::Address;
use tracing::debug;
use xc_01_prices::{MarketParam, MarketPrice, MarketPriceUpdate, MarketPricesApi, PricesError};

use super::{HandlerError, MsgResponse};
use crate::container::AppState;

pub(super) fn handle_create_oracle_market(
    state: &mut AppState,
    ctx: &mut BlockContext,
    authority: &Address,
    param: MarketParam,
    price: MarketPrice,
) -> Result<MsgResponse, HandlerError> {
    state
        .prices
        .authorities()
        .ensure(authority)
        .map_err(PricesError::from)?;
    let id = state.prices.create_market(ctx, param, price)?;
    Ok(MsgResponse::MarketCreated(id))
}

pub(super) fn handle_update_market_param(
    state: &mut AppState,
    ctx: &mut BlockContext,
    authority: &Address,
    param: MarketParam,
) -> Result<MsgResponse, HandlerError> {
    let id = param.id;
    let stored = state.prices.update_market_param(ctx, authority, id, param)?;
    Ok(MsgResponse::MarketParamUpdated(stored))
}

pub(super) fn handle_update_market_prices(
    state: &mut AppState,
    ctx: &mut BlockContext,
    updates: &[MarketPriceUpdate],
) -> Result<MsgResponse, HandlerError> {
    let applied = state.prices.update_market_prices(ctx, updates)?;
    debug!(
        candidates = updates.len(),
        applied = applied.len(),
        "[runtime] price update batch handled"
    );
    Ok(MsgResponse::PricesUpdated(applied))
}
