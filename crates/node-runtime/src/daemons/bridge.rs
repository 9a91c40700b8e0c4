//! Bridge daemon: reads bridge events off the external chain and caches
//! them until the proposer acknowledges them.

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::Rng;
use shared_types::{encode_address, Address, Coin};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use xc_02_bridge::{BridgeEvent, RecognizeOutcome, RecognizedEventCache};

use super::{retry_with_backoff, DaemonError, RetryPolicy};

/// External chain bridge log.
#[async_trait]
pub trait EthEventSource: Send + Sync {
    /// Endpoint name for logs.
    fn endpoint(&self) -> &str;

    /// Up to `max` events with id `>= from_id`, in id order.
    async fn events_since(&self, from_id: u32, max: usize) -> Result<Vec<BridgeEvent>, DaemonError>;
}

/// In-process external chain. Optionally emits random deposits on every
/// poll.
pub struct SimulatedEthChain {
    endpoint: String,
    denom: String,
    recipients: Vec<Address>,
    state: Mutex<ChainState>,
}

struct ChainState {
    events: Vec<BridgeEvent>,
    height: u64,
    deposits_per_poll: usize,
}

impl SimulatedEthChain {
    /// Empty chain paying out in `denom`.
    pub fn new(endpoint: impl Into<String>, denom: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            denom: denom.into(),
            recipients: Vec::new(),
            state: Mutex::new(ChainState {
                events: Vec::new(),
                height: 0,
                deposits_per_poll: 0,
            }),
        }
    }

    /// Emit up to `per_poll` random deposits to `recipients` on each poll.
    pub fn with_random_deposits(mut self, recipients: Vec<Address>, per_poll: usize) -> Self {
        self.recipients = recipients;
        self.state.get_mut().deposits_per_poll = per_poll;
        self
    }

    /// Record a deposit of `amount` to `recipient` in a new block.
    pub fn deposit(&self, recipient: &Address, amount: i128) -> u32 {
        let mut state = self.state.lock();
        self.push_deposit(&mut state, recipient, amount)
    }

    fn push_deposit(&self, state: &mut ChainState, recipient: &Address, amount: i128) -> u32 {
        let id = state.events.len() as u32;
        state.height += 1;
        state.events.push(BridgeEvent::new(
            id,
            encode_address(recipient),
            Coin::new(self.denom.clone(), amount),
            state.height,
        ));
        id
    }
}

#[async_trait]
impl EthEventSource for SimulatedEthChain {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn events_since(&self, from_id: u32, max: usize) -> Result<Vec<BridgeEvent>, DaemonError> {
        let mut state = self.state.lock();
        if !self.recipients.is_empty() && state.deposits_per_poll > 0 {
            let mut rng = rand::thread_rng();
            for _ in 0..rng.gen_range(0..=state.deposits_per_poll) {
                let recipient = self.recipients[rng.gen_range(0..self.recipients.len())];
                let amount = rng.gen_range(1..=1_000_000i128);
                self.push_deposit(&mut state, &recipient, amount);
            }
        }
        Ok(state
            .events
            .iter()
            .skip(from_id as usize)
            .take(max)
            .cloned()
            .collect())
    }
}

/// External chain poller.
pub struct BridgeDaemon {
    source: Arc<dyn EthEventSource>,
    cache: Arc<RecognizedEventCache>,
    /// Next id the chain expects; published by the block producer.
    acknowledged: Arc<AtomicU32>,
    cursor: AtomicU32,
    max_events: usize,
    loop_delay: Duration,
    retry: RetryPolicy,
}

impl BridgeDaemon {
    /// Create a daemon feeding `cache`.
    pub fn new(
        source: Arc<dyn EthEventSource>,
        cache: Arc<RecognizedEventCache>,
        acknowledged: Arc<AtomicU32>,
        max_events: usize,
        loop_delay_ms: u64,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            source,
            cache,
            acknowledged,
            cursor: AtomicU32::new(0),
            max_events,
            loop_delay: Duration::from_millis(loop_delay_ms),
            retry,
        }
    }

    /// One polling round. Returns how many new events were cached.
    pub async fn run_once(&self) -> Result<usize, DaemonError> {
        let acknowledged = self.acknowledged.load(Ordering::Acquire);
        let cursor = self.cursor.load(Ordering::Acquire);
        // Rewind when the next expected event was evicted by the proposer.
        let from_id = if cursor > acknowledged && !self.cache.contains(acknowledged) {
            acknowledged
        } else {
            cursor.max(acknowledged)
        };

        let events = retry_with_backoff(self.retry, "query bridge events", || {
            self.source.events_since(from_id, self.max_events)
        })
        .await?;
        let Some(last_id) = events.last().map(|e| e.id) else {
            return Ok(0);
        };

        let outcomes = retry_with_backoff(self.retry, "submit bridge events", || {
            let events = events.clone();
            async move { self.cache.add_events(events, acknowledged) }
        })
        .await
        .map_err(|e| DaemonError::Submission(e.to_string()))?;

        self.cursor.store(last_id.saturating_add(1), Ordering::Release);
        let added = outcomes
            .iter()
            .filter(|o| **o == RecognizeOutcome::Added)
            .count();
        debug!(added, next_query_id = last_id.saturating_add(1), "[xc-02] bridge daemon round done");
        Ok(added)
    }

    /// Poll until `shutdown` flips.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(
            endpoint = self.source.endpoint(),
            loop_delay_ms = self.loop_delay.as_millis() as u64,
            "[xc-02] bridge daemon started"
        );
        let mut interval = tokio::time::interval(self.loop_delay);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = self.run_once().await {
                        warn!(endpoint = self.source.endpoint(), "[xc-02] bridge daemon round failed: {}", e);
                    }
                    self.cache.prune_acknowledged(self.acknowledged.load(Ordering::Acquire));
                }
                _ = shutdown.changed() => {
                    info!("[xc-02] bridge daemon shutting down");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DENOM: &str = "bridge-token";

    fn daemon(chain: Arc<SimulatedEthChain>, acknowledged: Arc<AtomicU32>, burst: u64) -> BridgeDaemon {
        BridgeDaemon::new(
            chain,
            Arc::new(RecognizedEventCache::new(burst, 0)),
            acknowledged,
            10,
            10,
            RetryPolicy::new(2, 1),
        )
    }

    #[tokio::test]
    async fn test_round_caches_new_events_once() {
        let chain = Arc::new(SimulatedEthChain::new("sim", DENOM));
        chain.deposit(&[1u8; 20], 10);
        chain.deposit(&[2u8; 20], 20);
        let daemon = daemon(chain.clone(), Arc::new(AtomicU32::new(0)), 100);

        assert_eq!(daemon.run_once().await.unwrap(), 2);
        assert_eq!(daemon.run_once().await.unwrap(), 0);

        chain.deposit(&[3u8; 20], 30);
        assert_eq!(daemon.run_once().await.unwrap(), 1);

        let events = daemon.cache.get_events_to_acknowledge(0, 10);
        assert_eq!(events.iter().map(|e| e.id).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(events[2].coin, Coin::new(DENOM, 30));
    }

    #[tokio::test]
    async fn test_starts_from_acknowledged_id() {
        let chain = Arc::new(SimulatedEthChain::new("sim", DENOM));
        for _ in 0..3 {
            chain.deposit(&[1u8; 20], 10);
        }
        let daemon = daemon(chain, Arc::new(AtomicU32::new(2)), 100);
        assert_eq!(daemon.run_once().await.unwrap(), 1);
        assert_eq!(daemon.cache.len(), 1);
    }

    #[tokio::test]
    async fn test_rate_limited_submission_reported() {
        let chain = Arc::new(SimulatedEthChain::new("sim", DENOM));
        chain.deposit(&[1u8; 20], 10);
        let daemon = daemon(chain.clone(), Arc::new(AtomicU32::new(0)), 1);
        assert_eq!(daemon.run_once().await.unwrap(), 1);

        chain.deposit(&[1u8; 20], 10);
        assert!(matches!(
            daemon.run_once().await,
            Err(DaemonError::Submission(_))
        ));
    }

    #[tokio::test]
    async fn test_rewinds_after_eviction() {
        let chain = Arc::new(SimulatedEthChain::new("sim", DENOM));
        chain.deposit(&[1u8; 20], 10);
        chain.deposit(&[2u8; 20], 20);
        let daemon = daemon(chain, Arc::new(AtomicU32::new(0)), 100);
        assert_eq!(daemon.run_once().await.unwrap(), 2);

        daemon.cache.evict(0);
        assert_eq!(daemon.run_once().await.unwrap(), 1);
        assert_eq!(daemon.cache.get_events_to_acknowledge(0, 10).len(), 2);
    }

    #[tokio::test]
    async fn test_random_deposits_have_consecutive_ids() {
        let chain = SimulatedEthChain::new("sim", DENOM).with_random_deposits(vec![[7u8; 20]], 3);
        for _ in 0..4 {
            chain.events_since(0, usize::MAX).await.unwrap();
        }
        let all = chain.events_since(0, usize::MAX).await.unwrap();
        for (i, event) in all.iter().enumerate() {
            assert_eq!(event.id, i as u32);
            assert!(event.coin.amount > 0);
        }
    }
}
