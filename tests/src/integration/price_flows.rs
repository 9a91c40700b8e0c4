//! # Price Flows
//!
//! Exchange prices travel daemon cache → proposer → `UpdateMarketPrices`
//! → prices keeper → indexer batch, and governance manages markets
//! through ordinary transactions.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::{driver, genesis};
    use node_runtime::driver::propose_injected_msgs;
    use node_runtime::{DaemonCaches, HandlerError, Msg, MsgResponse, NodeConfig};
    use shared_indexer::SUBTYPE_MARKET;
    use shared_types::module_address;
    use xc_01_prices::test_utils::{market_param, market_price};
    use xc_01_prices::{MarketEvent, MarketEventKind, MarketPricesApi, PricesError};
    use xc_02_bridge::test_utils::alice;

    const BTC: u32 = 0;
    const ETH: u32 = 1;

    // =============================================================================
    // DAEMON → PROPOSER → KEEPER
    // =============================================================================

    #[test]
    fn test_exchange_median_reaches_committed_state() {
        let (mut driver, sender) = driver(genesis(0, 5));
        let mut subscription = sender.subscribe();
        let caches = DaemonCaches::new(&NodeConfig::default());

        caches.prices.push(BTC, "alpha", 2_100_000_000, 1_000).unwrap();
        caches.prices.push(BTC, "beta", 2_100_000_100, 1_000).unwrap();
        caches.prices.push(BTC, "gamma", 2_200_000_000, 1_000).unwrap();
        // ETH needs two exchanges.
        caches.prices.push(ETH, "alpha", 1_800_000_000, 1_000).unwrap();

        let msgs = propose_injected_msgs(driver.committed(), &caches, 10, 1_500);
        assert_eq!(msgs.len(), 1);

        let result = driver.execute_block(1, 1_500, msgs).unwrap();
        assert!(result.tx_results[0].is_ok());

        let committed = &driver.committed().prices;
        assert_eq!(committed.get_market_price(BTC).unwrap().price, 2_100_000_100);
        assert_eq!(committed.get_market_price(ETH).unwrap().price, 1_500_000_000);

        let block = subscription.try_recv().unwrap().unwrap();
        assert_eq!(block.height, 1);
        let events: Vec<MarketEvent> = block.decode_all(SUBTYPE_MARKET).unwrap();
        assert_eq!(events, vec![MarketEvent::price_update(BTC, 2_100_000_100)]);
    }

    #[test]
    fn test_small_moves_are_not_proposed() {
        let (driver, _) = driver(genesis(0, 5));
        let caches = DaemonCaches::new(&NodeConfig::default());
        // 500 ppm against a 1000 ppm threshold.
        caches.prices.push(BTC, "alpha", 2_001_000_000, 1_000).unwrap();
        caches.prices.push(BTC, "beta", 2_001_000_000, 1_000).unwrap();

        assert!(propose_injected_msgs(driver.committed(), &caches, 10, 1_000).is_empty());
    }

    #[test]
    fn test_below_threshold_update_is_skipped_not_failed() {
        let (mut driver, _) = driver(genesis(0, 5));
        let result = driver
            .execute_block(
                1,
                0,
                vec![Msg::UpdateMarketPrices {
                    updates: vec![
                        xc_01_prices::MarketPriceUpdate::new(BTC, 2_000_000_001),
                        xc_01_prices::MarketPriceUpdate::new(ETH, 1_600_000_000),
                    ],
                }],
            )
            .unwrap();

        match &result.tx_results[0].result {
            Ok(MsgResponse::PricesUpdated(applied)) => {
                assert_eq!(applied.len(), 1);
                assert_eq!(applied[0].id, ETH);
            }
            other => panic!("unexpected result {:?}", other),
        }
        assert_eq!(
            driver.committed().prices.get_market_price(BTC).unwrap().price,
            2_000_000_000
        );
    }

    // =============================================================================
    // GOVERNANCE
    // =============================================================================

    #[test]
    fn test_governance_market_lifecycle() {
        let (mut driver, _) = driver(genesis(0, 5));

        let block1 = driver
            .execute_block(
                1,
                0,
                vec![Msg::CreateOracleMarket {
                    authority: module_address("gov"),
                    param: market_param("SOL-USD", -4, 100),
                    price: market_price(-4, 1_000_000),
                }],
            )
            .unwrap();
        assert_eq!(
            block1.tx_results[0].result,
            Ok(MsgResponse::MarketCreated(2))
        );
        let created: Vec<MarketEvent> = block1.indexer_block.decode_all(SUBTYPE_MARKET).unwrap();
        assert!(matches!(
            &created[0].event,
            MarketEventKind::MarketCreate { pair, exponent: -4, .. } if pair == "SOL-USD"
        ));

        let mut param = market_param("SOL-USD", -4, 5_000);
        param.id = 2;
        driver
            .execute_block(
                2,
                0,
                vec![Msg::UpdateMarketParam {
                    authority: module_address("gov"),
                    param,
                }],
            )
            .unwrap();
        assert_eq!(
            driver.committed().prices.get_market_param(2).unwrap().min_price_change_ppm,
            5_000
        );

        // 0.4% move against the new 0.5% threshold.
        let block3 = driver
            .execute_block(
                3,
                0,
                vec![Msg::UpdateMarketPrices {
                    updates: vec![xc_01_prices::MarketPriceUpdate::new(2, 1_004_000)],
                }],
            )
            .unwrap();
        assert_eq!(block3.indexer_block.events.len(), 0);
        assert_eq!(
            driver.committed().prices.get_market_price(2).unwrap().price,
            1_000_000
        );
    }

    #[test]
    fn test_non_authority_cannot_manage_markets() {
        let (mut driver, _) = driver(genesis(0, 5));
        let result = driver
            .execute_block(
                1,
                0,
                vec![Msg::CreateOracleMarket {
                    authority: alice(),
                    param: market_param("SOL-USD", -4, 100),
                    price: market_price(-4, 1_000_000),
                }],
            )
            .unwrap();

        assert!(matches!(
            result.tx_results[0].result,
            Err(HandlerError::Prices(PricesError::Unauthorized(_)))
        ));
        assert_eq!(driver.committed().prices.market_count(), 2);
        assert!(result.indexer_block.events.is_empty());
    }
}
