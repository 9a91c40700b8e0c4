//! # Inbound Ports
//!
//! API trait defining what the Bridge Completion subsystem can do.

use crate::domain::{
    BridgeError, BridgeEvent, BridgeEventInfo, BridgeEventStatus, BridgeOutcome, EventParams,
    SafetyParams,
};
use shared_indexer::BlockContext;
use shared_types::Address;

/// Bridge API - inbound port.
pub trait BridgeApi {
    /// Release one event's funds from the custodial account.
    ///
    /// Validation strictly precedes the transfer; on error nothing changes.
    fn complete_bridge(&mut self, ctx: &mut BlockContext, event: &BridgeEvent)
        -> Result<(), BridgeError>;

    /// Record a proposer-supplied batch of observed events and schedule
    /// their completion `delay_blocks` from now.
    fn acknowledge_bridges(
        &mut self,
        ctx: &mut BlockContext,
        events: &[BridgeEvent],
    ) -> Result<(), BridgeError>;

    /// Complete every event scheduled at or before the current height.
    ///
    /// Per-event failures become `Rejected`; only indexer failures surface.
    fn complete_due_bridges(&mut self, ctx: &mut BlockContext)
        -> Result<Vec<BridgeOutcome>, BridgeError>;

    /// Replace the safety params. Authority-gated.
    fn update_safety_params(&mut self, caller: &Address, params: SafetyParams)
        -> Result<(), BridgeError>;

    /// Replace the event params. Authority-gated.
    fn update_event_params(&mut self, caller: &Address, params: EventParams)
        -> Result<(), BridgeError>;

    /// Status of an acknowledged event, `None` if never acknowledged.
    fn get_event_status(&self, id: u32) -> Option<BridgeEventStatus>;

    /// Acknowledgement progress.
    fn get_bridge_event_info(&self) -> BridgeEventInfo;

    /// Current safety params.
    fn get_safety_params(&self) -> SafetyParams;

    /// Current event params.
    fn get_event_params(&self) -> EventParams;
}
