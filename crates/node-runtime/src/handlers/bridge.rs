//! Bridge message handlers.

use shared_indexer::BlockContext;
use shared_types::Address;
use xc_02_bridge::{BridgeApi, BridgeEvent, EventParams, SafetyParams};

use super::{HandlerError, MsgResponse};
use crate::container::AppState;

pub(super) fn handle_acknowledge_bridges(
    state: &mut AppState,
    ctx: &mut BlockContext,
    events: &[BridgeEvent],
) -> Result<MsgResponse, HandlerError> {
    state.bridge.acknowledge_bridges(ctx, events)?;
    Ok(MsgResponse::BridgesAcknowledged(events.len()))
}

pub(super) fn handle_update_safety_params(
    state: &mut AppState,
    authority: &Address,
    params: SafetyParams,
) -> Result<MsgResponse, HandlerError> {
    state.bridge.update_safety_params(authority, params)?;
    Ok(MsgResponse::ParamsUpdated)
}

pub(super) fn handle_update_event_params(
    state: &mut AppState,
    authority: &Address,
    params: EventParams,
) -> Result<MsgResponse, HandlerError> {
    state.bridge.update_event_params(authority, params)?;
    Ok(MsgResponse::ParamsUpdated)
}
