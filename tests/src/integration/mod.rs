//! Block-level flows across the prices keeper, the bridge keeper and the
//! indexer stream.

pub mod bridge_flows;
pub mod indexer_flows;
pub mod price_flows;

#[cfg(test)]
pub(crate) mod fixtures {
    use node_runtime::{BlockDriver, GenesisBuilder, GenesisConfig, NodeConfig};
    use shared_indexer::{IndexerEventManager, InMemoryIndexerSender};
    use std::sync::Arc;
    use xc_02_bridge::test_utils::test_event_params;
    use xc_02_bridge::SafetyParams;
    use xc_telemetry::ChainMetrics;

    /// Default genesis markets (BTC-USD = 0, ETH-USD = 1) with a test
    /// bridge denom and the given custodial balance and delay.
    pub fn genesis(custodial_balance: i128, delay_blocks: u64) -> GenesisConfig {
        GenesisConfig {
            safety_params: SafetyParams {
                is_disabled: false,
                delay_blocks,
            },
            event_params: test_event_params(),
            custodial_balance,
            ..GenesisConfig::default()
        }
    }

    /// Driver at height 0 plus the sender its batches are shipped to.
    pub fn driver(genesis: GenesisConfig) -> (BlockDriver, Arc<InMemoryIndexerSender>) {
        let sender = Arc::new(InMemoryIndexerSender::new());
        let indexer = IndexerEventManager::new(sender.clone());
        let genesis = GenesisBuilder::new(genesis)
            .build(&NodeConfig::default(), indexer.clone())
            .unwrap();
        let metrics = ChainMetrics::new().unwrap();
        (BlockDriver::new(genesis.state, 0, indexer, metrics), sender)
    }
}
