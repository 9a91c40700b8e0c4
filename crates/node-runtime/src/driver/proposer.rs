//! Proposer-side construction of the injected messages.

use tracing::{debug, warn};
use xc_02_bridge::{invariant_acknowledgeable, BridgeApi, BridgeEvent, RecognizedEventCache};

use crate::container::{AppState, DaemonCaches};
use crate::handlers::Msg;

/// Messages the proposer prepends to its block, drawn from the daemon
/// caches against the committed `state`.
///
/// Bridge acknowledgements come first, then the price batch. Empty batches
/// are omitted and nothing is acknowledged while bridging is disabled.
/// Cached events the chain would refuse are cut off and evicted, so one bad
/// observation never invalidates the block.
pub fn propose_injected_msgs(
    state: &AppState,
    caches: &DaemonCaches,
    max_bridge_events: usize,
    now_ms: u64,
) -> Vec<Msg> {
    let mut msgs = Vec::new();

    if !state.bridge.get_safety_params().is_disabled {
        let next_id = state.bridge.get_bridge_event_info().next_id;
        let cached = caches
            .bridge_events
            .get_events_to_acknowledge(next_id, max_bridge_events);
        let events = acknowledgeable_prefix(state, &caches.bridge_events, cached);
        if !events.is_empty() {
            debug!(next_id, count = events.len(), "[runtime] proposing bridge acknowledgements");
            msgs.push(Msg::AcknowledgeBridges { events });
        }
    }

    let updates = state
        .prices
        .get_valid_market_price_updates(caches.prices.as_ref(), now_ms);
    if !updates.is_empty() {
        debug!(count = updates.len(), "[runtime] proposing price updates");
        msgs.push(Msg::UpdateMarketPrices { updates });
    }

    msgs
}

/// Longest prefix of `cached` that `acknowledge_bridges` accepts against
/// the committed bridge state. The first refused event is evicted.
fn acknowledgeable_prefix(
    state: &AppState,
    cache: &RecognizedEventCache,
    cached: Vec<BridgeEvent>,
) -> Vec<BridgeEvent> {
    let params = state.bridge.get_event_params();
    let mut info = state.bridge.get_bridge_event_info();
    let mut events = Vec::with_capacity(cached.len());
    for event in cached {
        match invariant_acknowledgeable(&info, &params, std::slice::from_ref(&event)) {
            Ok(next) => {
                info = next;
                events.push(event);
            }
            Err(e) => {
                warn!(id = event.id, "[runtime] cached bridge event refused: {}", e);
                cache.evict(event.id);
                break;
            }
        }
    }
    events
}
