//! # Domain Invariants
//!
//! Pre-mutation checks. Each returns an error without touching state.

use super::entities::BridgeEvent;
use super::errors::BridgeError;
use super::value_objects::{BridgeEventInfo, EventParams, SafetyParams};

/// Kill switch must be off.
pub fn invariant_bridging_enabled(params: &SafetyParams) -> Result<(), BridgeError> {
    if params.is_disabled {
        return Err(BridgeError::BridgingDisabled);
    }
    Ok(())
}

/// A batch must continue exactly where acknowledgement left off.
///
/// Ids are consecutive from `info.next_id`, external heights never decrease,
/// and every coin is in the bridge denom. Returns the info after the batch.
pub fn invariant_acknowledgeable(
    info: &BridgeEventInfo,
    params: &EventParams,
    events: &[BridgeEvent],
) -> Result<BridgeEventInfo, BridgeError> {
    let mut next = *info;
    for event in events {
        if event.id != next.next_id {
            return Err(BridgeError::UnexpectedEventId {
                expected: next.next_id,
                got: event.id,
            });
        }
        if event.eth_block_height < next.eth_block_height {
            return Err(BridgeError::InvalidEthBlockHeight {
                last: next.eth_block_height,
                got: event.eth_block_height,
            });
        }
        if event.coin.denom != params.denom {
            return Err(BridgeError::InvalidCoin(format!(
                "denom {} does not match bridge denom {}",
                event.coin.denom, params.denom
            )));
        }
        next = BridgeEventInfo {
            next_id: event.id.saturating_add(1),
            eth_block_height: event.eth_block_height,
        };
    }
    Ok(next)
}
