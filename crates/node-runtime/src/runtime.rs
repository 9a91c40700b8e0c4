//! # Node Runtime
//!
//! Owns the block driver, the daemon caches and the background tasks.
//!
//! ## Startup Sequence
//!
//! 1. Apply genesis and ship the height-0 indexer batch
//! 2. Spawn the indexer consumer, price daemon, bridge daemon and metrics
//!    endpoint
//! 3. Produce a block every `block_time_ms` from the daemon caches
//! 4. On shutdown, flip the watch channel and join every task

use anyhow::{Context, Result};
use shared_indexer::{IndexerEventManager, InMemoryIndexerSender, SUBTYPE_BRIDGE, SUBTYPE_MARKET};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use xc_01_prices::{MarketId, MarketPricesApi};
use xc_02_bridge::BridgeApi;
use xc_telemetry::{ChainMetrics, REGISTRY};

use crate::container::{DaemonCaches, NodeConfig};
use crate::daemons::{
    serve_metrics, unix_millis, BridgeDaemon, ExchangeQuerier, PriceDaemon, RetryPolicy,
    SimulatedEthChain, SimulatedExchange,
};
use crate::driver::{propose_injected_msgs, BlockDriver, BlockResult, DriverError};
use crate::genesis::{GenesisBuilder, GenesisConfig};

/// Names of the simulated exchanges the price daemon polls.
pub const SIMULATED_EXCHANGES: [&str; 3] = ["alpha", "beta", "gamma"];

/// A running node.
pub struct NodeRuntime {
    config: NodeConfig,
    driver: BlockDriver,
    caches: DaemonCaches,
    sender: Arc<InMemoryIndexerSender>,
    /// Next bridge event id the chain expects, for the bridge daemon.
    acknowledged: Arc<AtomicU32>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl NodeRuntime {
    /// Apply genesis and build the runtime. No task is started yet.
    pub fn new(config: NodeConfig, genesis: GenesisConfig, metrics: ChainMetrics) -> Result<Self> {
        config.validate().context("invalid node configuration")?;

        let sender = Arc::new(InMemoryIndexerSender::new());
        let indexer = IndexerEventManager::new(sender.clone());
        let genesis = GenesisBuilder::new(genesis)
            .build(&config, indexer.clone())
            .context("failed to apply genesis")?;
        indexer.send_onchain_data(genesis.block);

        let acknowledged = Arc::new(AtomicU32::new(
            genesis.state.bridge.get_bridge_event_info().next_id,
        ));
        let caches = DaemonCaches::new(&config);
        let driver = BlockDriver::new(genesis.state, 0, indexer, metrics);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Ok(Self {
            config,
            driver,
            caches,
            sender,
            acknowledged,
            shutdown_tx,
            shutdown_rx,
            tasks: Vec::new(),
        })
    }

    /// Block driver, read-only.
    pub fn driver(&self) -> &BlockDriver {
        &self.driver
    }

    /// Ingestion caches.
    pub fn caches(&self) -> &DaemonCaches {
        &self.caches
    }

    /// Indexer sender, for additional subscribers.
    pub fn indexer_sender(&self) -> Arc<InMemoryIndexerSender> {
        Arc::clone(&self.sender)
    }

    /// Spawn the indexer consumer and every enabled daemon.
    pub fn start_background_tasks(&mut self) {
        self.spawn_indexer_consumer();

        let retry = RetryPolicy::new(
            self.config.bridge.retry_max_attempts,
            self.config.bridge.retry_base_delay_ms,
        );

        if self.config.price.enabled {
            let markets: Vec<(MarketId, u64)> = self
                .driver
                .committed()
                .prices
                .get_all_market_param_prices()
                .into_iter()
                .map(|mp| (mp.param.id, mp.price.price))
                .collect();
            let exchanges: Vec<Arc<dyn ExchangeQuerier>> = SIMULATED_EXCHANGES
                .iter()
                .map(|name| {
                    Arc::new(
                        SimulatedExchange::new(*name, markets.iter().copied(), 2_000)
                            .with_failure_rate(0.05),
                    ) as Arc<dyn ExchangeQuerier>
                })
                .collect();
            let daemon = PriceDaemon::new(
                exchanges,
                markets.iter().map(|(id, _)| *id).collect(),
                Arc::clone(&self.caches.prices),
                self.config.price.loop_delay_ms,
                retry,
            );
            self.tasks.push(tokio::spawn(daemon.run(self.shutdown_rx.clone())));
        } else {
            info!("[runtime] price daemon disabled");
        }

        if self.config.bridge_daemon.enabled {
            let denom = self.driver.committed().bridge.get_event_params().denom;
            let chain = SimulatedEthChain::new(self.config.bridge_daemon.eth_rpc_endpoint.clone(), denom)
                .with_random_deposits(vec![[0xA1; 20], [0xB2; 20]], 2);
            let daemon = BridgeDaemon::new(
                Arc::new(chain),
                Arc::clone(&self.caches.bridge_events),
                Arc::clone(&self.acknowledged),
                self.config.bridge.max_events_per_block,
                self.config.bridge_daemon.loop_delay_ms,
                retry,
            );
            self.tasks.push(tokio::spawn(daemon.run(self.shutdown_rx.clone())));
        } else {
            info!("[runtime] bridge daemon disabled");
        }
    }

    /// Serve the global metrics registry on `listener` until shutdown.
    pub fn start_metrics_server(&mut self, listener: TcpListener) {
        self.tasks.push(tokio::spawn(serve_metrics(
            listener,
            REGISTRY.clone(),
            self.shutdown_rx.clone(),
        )));
    }

    fn spawn_indexer_consumer(&mut self) {
        let mut subscription = self.sender.subscribe();
        let mut shutdown = self.shutdown_rx.clone();
        self.tasks.push(tokio::spawn(async move {
            loop {
                tokio::select! {
                    block = subscription.recv() => {
                        let Some(block) = block else { break };
                        info!(
                            height = block.height,
                            market_events = block.events_of(SUBTYPE_MARKET).count(),
                            bridge_events = block.events_of(SUBTYPE_BRIDGE).count(),
                            "[indexer] block received"
                        );
                    }
                    _ = shutdown.changed() => break,
                }
            }
        }));
    }

    /// Propose and execute the next block at `now_ms`, then prune the
    /// caches against the new committed state.
    pub fn produce_block(&mut self, now_ms: u64) -> Result<BlockResult, DriverError> {
        let height = self.driver.last_height().saturating_add(1);
        let msgs = propose_injected_msgs(
            self.driver.committed(),
            &self.caches,
            self.config.bridge.max_events_per_block,
            now_ms,
        );
        let result = self.driver.execute_block(height, now_ms, msgs)?;

        let next_id = self.driver.committed().bridge.get_bridge_event_info().next_id;
        self.acknowledged.store(next_id, Ordering::Release);
        self.caches.bridge_events.prune_acknowledged(next_id);
        self.caches.prices.prune(now_ms);
        Ok(result)
    }

    /// Produce blocks every `block_time_ms` until shutdown.
    pub async fn run_block_producer(&mut self) {
        let mut interval = tokio::time::interval(Duration::from_millis(self.config.block_time_ms));
        let mut shutdown = self.shutdown_rx.clone();
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = self.produce_block(unix_millis()) {
                        error!("[runtime] block production failed: {}", e);
                    }
                }
                _ = shutdown.changed() => break,
            }
        }
    }

    /// Signal every task and wait for it to finish.
    pub async fn shutdown(&mut self) {
        info!("[runtime] initiating graceful shutdown");
        if self.shutdown_tx.send(true).is_err() {
            warn!("[runtime] no task was listening for shutdown");
        }
        for task in self.tasks.drain(..) {
            if let Err(e) = task.await {
                error!("[runtime] task ended abnormally: {}", e);
            }
        }
        info!(height = self.driver.last_height(), "[runtime] shutdown complete");
    }
}
