//! Acknowledgement of observed events.

use super::BridgeKeeper;
use crate::domain::{
    invariant_acknowledgeable, invariant_bridging_enabled, BridgeError, BridgeEvent,
    BridgeEventStatus,
};
use crate::ports::BankKeeper;
use shared_indexer::BlockContext;
use tracing::info;

impl<B: BankKeeper + Clone> BridgeKeeper<B> {
    pub(super) fn acknowledge_bridges_internal(
        &mut self,
        ctx: &mut BlockContext,
        events: &[BridgeEvent],
    ) -> Result<(), BridgeError> {
        invariant_bridging_enabled(&self.safety_params)?;
        let next_info = invariant_acknowledgeable(&self.event_info, &self.event_params, events)?;
        if events.is_empty() {
            return Ok(());
        }

        let complete_at = ctx.height().saturating_add(self.safety_params.delay_blocks);
        for event in events {
            self.statuses.insert(event.id, BridgeEventStatus::Observed);
        }
        self.scheduled
            .entry(complete_at)
            .or_default()
            .extend(events.iter().cloned());
        self.event_info = next_info;

        info!(
            count = events.len(),
            next_id = next_info.next_id,
            complete_at,
            "[xc-02] bridge events acknowledged"
        );
        Ok(())
    }
}
