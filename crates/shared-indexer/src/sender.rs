//! # Indexer Message Sender
//!
//! Outbound port transporting produced batches off-node. The in-memory
//! implementation fans blocks out over a `tokio::sync::broadcast` channel;
//! a networked deployment would put a Kafka or socket producer behind the
//! same trait.

use crate::events::IndexerBlock;
use crate::DEFAULT_CHANNEL_CAPACITY;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Transport for produced indexer batches.
pub trait IndexerMessageSender: Send + Sync {
    /// Whether the sender forwards anything.
    fn enabled(&self) -> bool;

    /// Ship one block batch.
    fn send_onchain_data(&self, block: IndexerBlock);
}

/// Sender that drops everything; used by nodes not feeding an indexer.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopIndexerSender;

impl IndexerMessageSender for NoopIndexerSender {
    fn enabled(&self) -> bool {
        false
    }

    fn send_onchain_data(&self, _block: IndexerBlock) {}
}

/// In-memory broadcast sender.
pub struct InMemoryIndexerSender {
    sender: broadcast::Sender<IndexerBlock>,
    blocks_sent: AtomicU64,
    capacity: usize,
}

impl InMemoryIndexerSender {
    /// Create with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create with a specific per-subscriber buffer.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            blocks_sent: AtomicU64::new(0),
            capacity,
        }
    }

    /// Subscribe to produced blocks.
    #[must_use]
    pub fn subscribe(&self) -> IndexerSubscription {
        IndexerSubscription {
            receiver: self.sender.subscribe(),
        }
    }

    /// Number of blocks handed to the channel.
    pub fn blocks_sent(&self) -> u64 {
        self.blocks_sent.load(Ordering::Relaxed)
    }

    /// Channel capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryIndexerSender {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexerMessageSender for InMemoryIndexerSender {
    fn enabled(&self) -> bool {
        true
    }

    fn send_onchain_data(&self, block: IndexerBlock) {
        let height = block.height;
        self.blocks_sent.fetch_add(1, Ordering::Relaxed);
        match self.sender.send(block) {
            Ok(receivers) => debug!(height, receivers, "[indexer] block broadcast"),
            Err(_) => warn!(height, "[indexer] block dropped (no subscribers)"),
        }
    }
}

/// Errors from a subscription.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The sender was dropped.
    #[error("indexer sender closed")]
    Closed,
}

/// Receiving side of [`InMemoryIndexerSender`].
pub struct IndexerSubscription {
    receiver: broadcast::Receiver<IndexerBlock>,
}

impl IndexerSubscription {
    /// Wait for the next block. `None` once the sender is gone.
    pub async fn recv(&mut self) -> Option<IndexerBlock> {
        loop {
            match self.receiver.recv().await {
                Ok(block) => return Some(block),
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    warn!(lagged = count, "[indexer] subscriber lagged, blocks dropped");
                }
            }
        }
    }

    /// Non-blocking receive.
    pub fn try_recv(&mut self) -> Result<Option<IndexerBlock>, SubscriptionError> {
        loop {
            match self.receiver.try_recv() {
                Ok(block) => return Ok(Some(block)),
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => {
                    return Err(SubscriptionError::Closed)
                }
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_block(height: u64) -> IndexerBlock {
        IndexerBlock {
            height,
            time_ms: 0,
            events: vec![],
        }
    }

    #[test]
    fn test_send_without_subscribers_counts() {
        let sender = InMemoryIndexerSender::new();
        sender.send_onchain_data(empty_block(1));
        assert_eq!(sender.blocks_sent(), 1);
    }

    #[test]
    fn test_try_recv_in_order() {
        let sender = InMemoryIndexerSender::with_capacity(8);
        let mut sub = sender.subscribe();
        sender.send_onchain_data(empty_block(1));
        sender.send_onchain_data(empty_block(2));

        assert_eq!(sub.try_recv().unwrap().unwrap().height, 1);
        assert_eq!(sub.try_recv().unwrap().unwrap().height, 2);
        assert_eq!(sub.try_recv().unwrap(), None);
    }

    #[test]
    fn test_closed_subscription() {
        let sender = InMemoryIndexerSender::new();
        let mut sub = sender.subscribe();
        drop(sender);
        assert_eq!(sub.try_recv(), Err(SubscriptionError::Closed));
    }

    #[test]
    fn test_noop_is_disabled() {
        assert!(!NoopIndexerSender.enabled());
    }
}
