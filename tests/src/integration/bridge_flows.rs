//! # Bridge Flows
//!
//! External deposits are acknowledged by the proposer, wait out the
//! safety delay and are paid from the custodial module account in the
//! end-block sweep.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::{driver, genesis};
    use node_runtime::driver::propose_injected_msgs;
    use node_runtime::{DaemonCaches, DriverError, Msg, NodeConfig};
    use shared_indexer::SUBTYPE_BRIDGE;
    use shared_types::{encode_address, module_address};
    use xc_02_bridge::test_utils::{alice, bridge_event, TEST_DENOM};
    use xc_02_bridge::{
        BankKeeper, BridgeApi, BridgeCompletedEvent, BridgeEventStatus, SafetyParams, MODULE_NAME,
    };

    fn custodial_balance(driver: &node_runtime::BlockDriver) -> i128 {
        driver
            .committed()
            .bridge
            .bank()
            .get_balance(&module_address(MODULE_NAME), TEST_DENOM)
            .amount
    }

    fn alice_balance(driver: &node_runtime::BlockDriver) -> i128 {
        driver
            .committed()
            .bridge
            .bank()
            .get_balance(&alice(), TEST_DENOM)
            .amount
    }

    #[test]
    fn test_deposit_paid_after_delay_from_custodial_account() {
        let (mut driver, _) = driver(genesis(1_000, 2));
        assert_eq!(custodial_balance(&driver), 1_000);

        let caches = DaemonCaches::new(&NodeConfig::default());
        caches
            .bridge_events
            .add_events(vec![bridge_event(0, &alice(), 888, 40)], 0)
            .unwrap();
        let msgs = propose_injected_msgs(driver.committed(), &caches, 10, 0);
        driver.execute_block(1, 0, msgs).unwrap();

        let bridge = &driver.committed().bridge;
        assert_eq!(bridge.get_event_status(0), Some(BridgeEventStatus::Observed));
        assert_eq!(bridge.get_bridge_event_info().next_id, 1);
        assert_eq!(bridge.get_bridge_event_info().eth_block_height, 40);

        driver.execute_block(2, 0, vec![]).unwrap();
        assert_eq!(alice_balance(&driver), 0);

        let block3 = driver.execute_block(3, 0, vec![]).unwrap();
        assert_eq!(custodial_balance(&driver), 112);
        assert_eq!(alice_balance(&driver), 888);
        assert_eq!(
            driver.committed().bridge.get_event_status(0),
            Some(BridgeEventStatus::Completed)
        );

        let completed: Vec<BridgeCompletedEvent> =
            block3.indexer_block.decode_all(SUBTYPE_BRIDGE).unwrap();
        assert_eq!(
            completed,
            vec![BridgeCompletedEvent {
                id: 0,
                address: encode_address(&alice()),
                denom: TEST_DENOM.to_string(),
                amount: 888,
            }]
        );
    }

    #[test]
    fn test_underfunded_custodial_rejects_without_aborting() {
        let (mut driver, _) = driver(genesis(1_000, 0));
        let result = driver
            .execute_block(
                1,
                0,
                vec![Msg::AcknowledgeBridges {
                    events: vec![
                        bridge_event(0, &alice(), 2_000, 10),
                        bridge_event(1, &alice(), 600, 11),
                    ],
                }],
            )
            .unwrap();

        assert_eq!(result.bridge_outcomes.len(), 2);
        assert!(matches!(
            result.bridge_outcomes[0].status,
            BridgeEventStatus::Rejected(_)
        ));
        assert_eq!(result.bridge_outcomes[0].reason, Some("insufficient_funds"));
        assert_eq!(result.bridge_outcomes[1].status, BridgeEventStatus::Completed);
        assert_eq!(custodial_balance(&driver), 400);
        assert_eq!(alice_balance(&driver), 600);
        assert_eq!(result.indexer_block.events_of(SUBTYPE_BRIDGE).count(), 1);
    }

    #[test]
    fn test_disabling_bridge_rejects_pending_completions() {
        let (mut driver, _) = driver(genesis(1_000, 2));
        driver
            .execute_block(
                1,
                0,
                vec![Msg::AcknowledgeBridges {
                    events: vec![bridge_event(0, &alice(), 100, 10)],
                }],
            )
            .unwrap();
        driver
            .execute_block(
                2,
                0,
                vec![Msg::UpdateSafetyParams {
                    authority: module_address("gov"),
                    params: SafetyParams {
                        is_disabled: true,
                        delay_blocks: 2,
                    },
                }],
            )
            .unwrap();

        let block3 = driver.execute_block(3, 0, vec![]).unwrap();
        assert_eq!(block3.bridge_outcomes[0].reason, Some("disabled"));
        assert_eq!(alice_balance(&driver), 0);
        assert_eq!(custodial_balance(&driver), 1_000);

        // An acknowledgement while disabled invalidates the block.
        let err = driver
            .execute_block(
                4,
                0,
                vec![Msg::AcknowledgeBridges {
                    events: vec![bridge_event(1, &alice(), 100, 12)],
                }],
            )
            .unwrap_err();
        assert!(matches!(err, DriverError::BlockAborted { height: 4, .. }));
        assert_eq!(driver.last_height(), 3);
    }

    #[test]
    fn test_acknowledged_ids_pruned_from_cache() {
        let (mut driver, _) = driver(genesis(1_000, 5));
        let caches = DaemonCaches::new(&NodeConfig::default());
        caches
            .bridge_events
            .add_events(
                (0..4).map(|id| bridge_event(id, &alice(), 10, 100 + u64::from(id))).collect(),
                0,
            )
            .unwrap();

        let msgs = propose_injected_msgs(driver.committed(), &caches, 3, 0);
        driver.execute_block(1, 0, msgs).unwrap();
        let next_id = driver.committed().bridge.get_bridge_event_info().next_id;
        assert_eq!(next_id, 3);
        assert_eq!(caches.bridge_events.prune_acknowledged(next_id), 3);

        let msgs = propose_injected_msgs(driver.committed(), &caches, 3, 0);
        assert!(matches!(&msgs[..], [Msg::AcknowledgeBridges { events }] if events[0].id == 3));
    }
}
