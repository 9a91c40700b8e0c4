//! # Bridge Keeper
//!
//! Acknowledges observed bridge events, holds them for `delay_blocks`, then
//! releases funds from the custodial account.
//!
//! Single-threaded like the rest of block execution: the driver owns the
//! keeper and branches it by cloning.

mod acknowledge;
mod complete;


use crate::domain::{
    BridgeError, BridgeEvent, BridgeEventInfo, BridgeEventStatus, BridgeOutcome, EventParams,
    SafetyParams,
};
use crate::ports::{BankKeeper, BridgeApi};
use crate::MODULE_NAME;
use shared_indexer::{BlockContext, IndexerEventManager};
use shared_types::{module_address, Address, AuthoritySet};
use std::collections::BTreeMap;
use tracing::info;

/// Bridge keeper over a ledger `B`.
#[derive(Clone)]
pub struct BridgeKeeper<B: BankKeeper + Clone> {
    safety_params: SafetyParams,
    event_params: EventParams,
    event_info: BridgeEventInfo,
    /// Completion height -> events due at that height, in id order.
    scheduled: BTreeMap<u64, Vec<BridgeEvent>>,
    statuses: BTreeMap<u32, BridgeEventStatus>,
    bank: B,
    authorities: AuthoritySet,
    indexer: IndexerEventManager,
}

impl<B: BankKeeper + Clone> BridgeKeeper<B> {
    /// Create a keeper with explicit params.
    pub fn new(
        safety_params: SafetyParams,
        event_params: EventParams,
        bank: B,
        authorities: AuthoritySet,
        indexer: IndexerEventManager,
    ) -> Self {
        Self {
            safety_params,
            event_params,
            event_info: BridgeEventInfo::default(),
            scheduled: BTreeMap::new(),
            statuses: BTreeMap::new(),
            bank,
            authorities,
            indexer,
        }
    }

    /// Custodial account funds are released from.
    pub fn custodial_address() -> Address {
        module_address(MODULE_NAME)
    }

    /// Ledger, read-only.
    pub fn bank(&self) -> &B {
        &self.bank
    }

    /// Ledger, for genesis funding and other modules' transfers.
    pub fn bank_mut(&mut self) -> &mut B {
        &mut self.bank
    }

    /// Events acknowledged but not yet processed, in completion order.
    pub fn pending_events(&self) -> impl Iterator<Item = (u64, &BridgeEvent)> {
        self.scheduled
            .iter()
            .flat_map(|(height, events)| events.iter().map(move |e| (*height, e)))
    }
}

impl<B: BankKeeper + Clone> BridgeApi for BridgeKeeper<B> {
    fn complete_bridge(
        &mut self,
        ctx: &mut BlockContext,
        event: &BridgeEvent,
    ) -> Result<(), BridgeError> {
        self.complete_bridge_internal(ctx, event)
    }

    fn acknowledge_bridges(
        &mut self,
        ctx: &mut BlockContext,
        events: &[BridgeEvent],
    ) -> Result<(), BridgeError> {
        self.acknowledge_bridges_internal(ctx, events)
    }

    fn complete_due_bridges(
        &mut self,
        ctx: &mut BlockContext,
    ) -> Result<Vec<BridgeOutcome>, BridgeError> {
        self.complete_due_bridges_internal(ctx)
    }

    fn update_safety_params(
        &mut self,
        caller: &Address,
        params: SafetyParams,
    ) -> Result<(), BridgeError> {
        self.authorities.ensure(caller)?;
        info!(
            is_disabled = params.is_disabled,
            delay_blocks = params.delay_blocks,
            "[xc-02] safety params updated"
        );
        self.safety_params = params;
        Ok(())
    }

    fn update_event_params(
        &mut self,
        caller: &Address,
        params: EventParams,
    ) -> Result<(), BridgeError> {
        self.authorities.ensure(caller)?;
        shared_types::validate_denom(&params.denom)?;
        info!(denom = %params.denom, eth_chain_id = params.eth_chain_id, "[xc-02] event params updated");
        self.event_params = params;
        Ok(())
    }

    fn get_event_status(&self, id: u32) -> Option<BridgeEventStatus> {
        self.statuses.get(&id).cloned()
    }

    fn get_bridge_event_info(&self) -> BridgeEventInfo {
        self.event_info
    }

    fn get_safety_params(&self) -> SafetyParams {
        self.safety_params.clone()
    }

    fn get_event_params(&self) -> EventParams {
        self.event_params.clone()
    }
}
