//! Completion: single events and the end-block sweep.

use super::BridgeKeeper;
use crate::domain::{
    invariant_bridging_enabled, BridgeError, BridgeEvent, BridgeEventStatus, BridgeOutcome,
};
use crate::events::{BridgeCompletedEvent, BRIDGE_EVENT_VERSION};
use crate::ports::BankKeeper;
use shared_indexer::{BlockContext, SUBTYPE_BRIDGE};
use shared_types::decode_address;
use tracing::{info, warn};

impl<B: BankKeeper + Clone> BridgeKeeper<B> {
    pub(super) fn complete_bridge_internal(
        &mut self,
        ctx: &mut BlockContext,
        event: &BridgeEvent,
    ) -> Result<(), BridgeError> {
        invariant_bridging_enabled(&self.safety_params)?;
        event.coin.validate_positive()?;
        let amount = event
            .coin
            .positive_amount()
            .ok_or_else(|| BridgeError::InvalidCoin(event.coin.to_string()))?;
        let recipient = decode_address(&event.address)?;

        let payload = BridgeCompletedEvent {
            id: event.id,
            address: event.address.clone(),
            denom: event.coin.denom.clone(),
            amount,
        };
        // Emit before moving funds; a failed transfer rolls the log back.
        let checkpoint = ctx.log().checkpoint();
        self.indexer
            .add_txn_event(ctx, SUBTYPE_BRIDGE, BRIDGE_EVENT_VERSION, &payload)?;
        if let Err(e) = self
            .bank
            .transfer(&Self::custodial_address(), &recipient, &event.coin)
        {
            ctx.log_mut().rollback_to(checkpoint);
            return Err(e.into());
        }

        info!(
            id = event.id,
            address = %event.address,
            coin = %event.coin,
            "[xc-02] bridge completed"
        );
        Ok(())
    }

    pub(super) fn complete_due_bridges_internal(
        &mut self,
        ctx: &mut BlockContext,
    ) -> Result<Vec<BridgeOutcome>, BridgeError> {
        let later = self.scheduled.split_off(&ctx.height().saturating_add(1));
        let due = std::mem::replace(&mut self.scheduled, later);

        let mut outcomes = Vec::new();
        for event in due.into_values().flatten() {
            self.statuses.insert(event.id, BridgeEventStatus::Validated);
            let (status, reason) = match self.complete_bridge_internal(ctx, &event) {
                Ok(()) => (BridgeEventStatus::Completed, None),
                Err(BridgeError::Indexer(e)) => return Err(BridgeError::Indexer(e)),
                Err(e) => {
                    warn!(id = event.id, reason = e.reason(), "[xc-02] bridge rejected: {}", e);
                    (BridgeEventStatus::Rejected(e.to_string()), Some(e.reason()))
                }
            };
            self.statuses.insert(event.id, status.clone());
            outcomes.push(BridgeOutcome {
                id: event.id,
                status,
                reason,
            });
        }
        Ok(outcomes)
    }
}
