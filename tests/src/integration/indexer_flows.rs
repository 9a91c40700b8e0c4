//! # Indexer Flows
//!
//! The per-block batch shipped to the off-chain indexer: append order,
//! per-transaction rollback, block aborts and determinism across nodes.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::{driver, genesis};
    use node_runtime::{GenesisConfig, Msg, NodeConfig, NodeRuntime};
    use shared_indexer::{EventOrigin, SUBTYPE_BRIDGE, SUBTYPE_MARKET};
    use shared_types::module_address;
    use std::time::Duration;
    use tokio::time::timeout;
    use xc_01_prices::test_utils::{market_param, market_price};
    use xc_01_prices::{MarketEvent, MarketEventKind, MarketPriceUpdate, MarketPricesApi};
    use xc_02_bridge::test_utils::{alice, bridge_event};
    use xc_telemetry::ChainMetrics;

    fn create(pair: &str) -> Msg {
        Msg::CreateOracleMarket {
            authority: module_address("gov"),
            param: market_param(pair, -4, 100),
            price: market_price(-4, 1_000_000),
        }
    }

    fn pairs(events: &[MarketEvent]) -> Vec<String> {
        events
            .iter()
            .filter_map(|e| match &e.event {
                MarketEventKind::MarketCreate { pair, .. } => Some(pair.clone()),
                _ => None,
            })
            .collect()
    }

    // =============================================================================
    // ORDERING AND ATOMICITY
    // =============================================================================

    #[test]
    fn test_events_keep_append_order() {
        let (mut driver, _) = driver(genesis(0, 5));
        let result = driver
            .execute_block(1, 0, vec![create("AAA-USD"), create("BBB-USD"), create("CCC-USD")])
            .unwrap();

        let block = &result.indexer_block;
        let sequences: Vec<u32> = block.events.iter().map(|e| e.sequence).collect();
        assert_eq!(sequences, vec![0, 1, 2]);
        let origins: Vec<EventOrigin> = block.events.iter().map(|e| e.origin).collect();
        assert_eq!(
            origins,
            vec![
                EventOrigin::Transaction { tx_index: 0 },
                EventOrigin::Transaction { tx_index: 1 },
                EventOrigin::Transaction { tx_index: 2 },
            ]
        );
        let events: Vec<MarketEvent> = block.decode_all(SUBTYPE_MARKET).unwrap();
        assert_eq!(pairs(&events), vec!["AAA-USD", "BBB-USD", "CCC-USD"]);
    }

    #[test]
    fn test_failed_transaction_contributes_no_events() {
        let (mut driver, _) = driver(genesis(0, 5));
        let result = driver
            .execute_block(1, 0, vec![create("AAA-USD"), create("AAA-USD"), create("CCC-USD")])
            .unwrap();

        assert!(result.tx_results[1].result.is_err());
        let block = &result.indexer_block;
        assert_eq!(block.events.len(), 2);
        assert_eq!(block.events[1].sequence, 1);
        assert_eq!(block.events[1].origin, EventOrigin::Transaction { tx_index: 2 });
        let events: Vec<MarketEvent> = block.decode_all(SUBTYPE_MARKET).unwrap();
        assert_eq!(pairs(&events), vec!["AAA-USD", "CCC-USD"]);
    }

    #[test]
    fn test_end_block_events_follow_transactions() {
        let (mut driver, _) = driver(genesis(1_000, 0));
        let result = driver
            .execute_block(
                1,
                0,
                vec![
                    Msg::AcknowledgeBridges {
                        events: vec![bridge_event(0, &alice(), 10, 1)],
                    },
                    create("AAA-USD"),
                ],
            )
            .unwrap();

        let block = &result.indexer_block;
        assert_eq!(block.events.len(), 2);
        assert_eq!(block.events[0].subtype, SUBTYPE_MARKET);
        assert_eq!(block.events[1].subtype, SUBTYPE_BRIDGE);
        assert_eq!(block.events[1].origin, EventOrigin::EndBlock);
    }

    #[test]
    fn test_aborted_block_ships_nothing_and_retry_is_clean() {
        let (mut driver, sender) = driver(genesis(0, 5));
        let mut subscription = sender.subscribe();

        let bad_prices = Msg::UpdateMarketPrices {
            updates: vec![MarketPriceUpdate::new(42, 1)],
        };
        assert!(driver
            .execute_block(1, 0, vec![create("AAA-USD"), bad_prices])
            .is_err());
        assert_eq!(subscription.try_recv().unwrap(), None);

        driver.execute_block(1, 0, vec![create("BBB-USD")]).unwrap();
        let block = subscription.try_recv().unwrap().unwrap();
        assert_eq!(block.height, 1);
        let events: Vec<MarketEvent> = block.decode_all(SUBTYPE_MARKET).unwrap();
        assert_eq!(pairs(&events), vec!["BBB-USD"]);
        assert_eq!(events[0].market_id, 2);
    }

    // =============================================================================
    // DETERMINISM
    // =============================================================================

    #[test]
    fn test_identical_inputs_produce_identical_batches() {
        let blocks = || {
            vec![
                vec![create("AAA-USD"), create("AAA-USD")],
                vec![Msg::UpdateMarketPrices {
                    updates: vec![MarketPriceUpdate::new(0, 2_500_000_000)],
                }],
                vec![Msg::AcknowledgeBridges {
                    events: vec![bridge_event(0, &alice(), 300, 7)],
                }],
                vec![],
            ]
        };

        let run = || {
            let (mut driver, _) = driver(genesis(1_000, 1));
            let batches: Vec<_> = blocks()
                .into_iter()
                .enumerate()
                .map(|(i, msgs)| {
                    let height = i as u64 + 1;
                    driver
                        .execute_block(height, height * 1_000, msgs)
                        .unwrap()
                        .indexer_block
                })
                .collect();
            (batches, driver.committed().prices.get_all_market_param_prices())
        };

        let (first_batches, first_markets) = run();
        let (second_batches, second_markets) = run();
        assert_eq!(first_batches, second_batches);
        assert_eq!(first_markets, second_markets);
        assert_eq!(first_batches[3].events_of(SUBTYPE_BRIDGE).count(), 1);
    }

    // =============================================================================
    // RUNTIME SUBSCRIBERS
    // =============================================================================

    #[tokio::test]
    async fn test_subscriber_receives_produced_blocks() {
        let mut runtime =
            NodeRuntime::new(NodeConfig::default(), GenesisConfig::devnet(), ChainMetrics::new().unwrap())
                .unwrap();
        let mut subscription = runtime.indexer_sender().subscribe();

        runtime.caches().prices.push(1, "alpha", 1_600_000_000, 1_000).unwrap();
        runtime.caches().prices.push(1, "beta", 1_600_000_000, 1_000).unwrap();
        runtime.produce_block(1_000).unwrap();
        runtime.produce_block(2_000).unwrap();

        let first = timeout(Duration::from_secs(1), subscription.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.height, 1);
        assert_eq!(first.time_ms, 1_000);
        let events: Vec<MarketEvent> = first.decode_all(SUBTYPE_MARKET).unwrap();
        assert_eq!(events, vec![MarketEvent::price_update(1, 1_600_000_000)]);

        let second = timeout(Duration::from_secs(1), subscription.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(second.height, 2);
        assert!(second.events.is_empty());
    }
}
