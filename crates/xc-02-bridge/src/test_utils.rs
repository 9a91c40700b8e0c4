//! # Test Utilities
//!
//! Fixtures for bridge tests in this crate and in the integration suite.

use crate::adapters::InMemoryBank;
use crate::domain::{BridgeEvent, EventParams, SafetyParams};
use crate::ports::BankKeeper;
use crate::service::BridgeKeeper;
use shared_indexer::{IndexerEventManager, InMemoryIndexerSender};
use shared_types::{encode_address, module_address, Address, AuthoritySet, Coin};
use std::sync::Arc;

/// Bridge denom used by fixtures.
pub const TEST_DENOM: &str = "dv4tnt";

/// Governance authority used by fixtures.
pub fn gov_authority() -> Address {
    module_address("gov")
}

/// A recipient account.
pub fn alice() -> Address {
    [0xA1; 20]
}

/// Event params with [`TEST_DENOM`].
pub fn test_event_params() -> EventParams {
    EventParams {
        denom: TEST_DENOM.to_string(),
        ..EventParams::default()
    }
}

/// Event paying `amount` of the test denom to `recipient`.
pub fn bridge_event(id: u32, recipient: &Address, amount: i128, eth_block_height: u64) -> BridgeEvent {
    BridgeEvent::new(
        id,
        encode_address(recipient),
        Coin::new(TEST_DENOM, amount),
        eth_block_height,
    )
}

/// Keeper whose custodial account holds `custodial_balance`.
pub fn create_test_keeper(
    safety_params: SafetyParams,
    custodial_balance: i128,
) -> (BridgeKeeper<InMemoryBank>, Arc<InMemoryIndexerSender>) {
    let sender = Arc::new(InMemoryIndexerSender::new());
    let indexer = IndexerEventManager::new(sender.clone());
    let mut keeper = BridgeKeeper::new(
        safety_params,
        test_event_params(),
        InMemoryBank::new(),
        AuthoritySet::new([gov_authority()]),
        indexer,
    );
    if custodial_balance > 0 {
        let custodial = BridgeKeeper::<InMemoryBank>::custodial_address();
        if let Err(e) = keeper
            .bank_mut()
            .mint_to(&custodial, &Coin::new(TEST_DENOM, custodial_balance))
        {
            panic!("fixture mint failed: {}", e);
        }
    }
    (keeper, sender)
}
