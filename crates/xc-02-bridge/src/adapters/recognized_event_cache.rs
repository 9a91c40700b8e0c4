//! Recognized Bridge Event Cache
//!
//! Per-validator store of bridge events the bridge daemon has observed on
//! the external chain. The proposer drains consecutive runs from it into
//! `acknowledge_bridges`; never part of chain state.

use crate::domain::BridgeEvent;
use parking_lot::RwLock;
use shared_types::RateLimiter;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, warn};

/// Result of a daemon push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecognizeOutcome {
    /// New event stored.
    Added,
    /// Id already known or already acknowledged; ignored.
    Duplicate,
}

/// Daemon-side ingestion errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecognizeError {
    /// Ingestion point is rate limited; the daemon should back off.
    #[error("Bridge event ingestion rate limited")]
    RateLimited,
}

/// Thread-safe cache of recognized bridge events keyed by id.
pub struct RecognizedEventCache {
    events: RwLock<BTreeMap<u32, BridgeEvent>>,
    rate_limiter: RateLimiter,
}

impl RecognizedEventCache {
    /// Create a cache guarded by a `burst` / `rate_per_sec` token bucket.
    pub fn new(burst: u64, rate_per_sec: u64) -> Self {
        Self {
            events: RwLock::new(BTreeMap::new()),
            rate_limiter: RateLimiter::new(burst, rate_per_sec),
        }
    }

    /// Store observed events. Idempotent by id; events below
    /// `next_acknowledged_id` are dropped.
    pub fn add_events(
        &self,
        events: Vec<BridgeEvent>,
        next_acknowledged_id: u32,
    ) -> Result<Vec<RecognizeOutcome>, RecognizeError> {
        if !self.rate_limiter.try_acquire() {
            warn!("[xc-02] bridge event ingestion rate limited");
            return Err(RecognizeError::RateLimited);
        }
        let mut cache = self.events.write();
        let outcomes = events
            .into_iter()
            .map(|event| {
                if event.id < next_acknowledged_id || cache.contains_key(&event.id) {
                    return RecognizeOutcome::Duplicate;
                }
                debug!(id = event.id, "[xc-02] bridge event recognized");
                cache.insert(event.id, event);
                RecognizeOutcome::Added
            })
            .collect();
        Ok(outcomes)
    }

    /// Consecutive run of at most `max` events starting at `next_id`.
    pub fn get_events_to_acknowledge(&self, next_id: u32, max: usize) -> Vec<BridgeEvent> {
        let cache = self.events.read();
        let mut out = Vec::new();
        let mut expected = next_id;
        for (id, event) in cache.range(next_id..) {
            if *id != expected || out.len() >= max {
                break;
            }
            out.push(event.clone());
            expected = expected.saturating_add(1);
        }
        out
    }

    /// Drop events whose ids were acknowledged on chain.
    pub fn prune_acknowledged(&self, next_id: u32) -> usize {
        let mut cache = self.events.write();
        let retained = cache.split_off(&next_id);
        let removed = cache.len();
        *cache = retained;
        removed
    }

    /// Drop a single event the chain would refuse to acknowledge, so the
    /// daemon can observe it again.
    pub fn evict(&self, id: u32) -> Option<BridgeEvent> {
        let evicted = self.events.write().remove(&id);
        if evicted.is_some() {
            warn!(id, "[xc-02] recognized bridge event evicted");
        }
        evicted
    }

    /// True if `id` is cached.
    pub fn contains(&self, id: u32) -> bool {
        self.events.read().contains_key(&id)
    }

    /// Number of cached events.
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// True if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::Coin;

    fn event(id: u32) -> BridgeEvent {
        BridgeEvent::new(
            id,
            "0x0000000000000000000000000000000000000001",
            Coin::new("dv4tnt", 100),
            u64::from(id),
        )
    }

    fn cache() -> RecognizedEventCache {
        RecognizedEventCache::new(100, 100)
    }

    #[test]
    fn test_idempotent_by_id() {
        let cache = cache();
        let first = cache.add_events(vec![event(0), event(1)], 0).unwrap();
        assert_eq!(first, vec![RecognizeOutcome::Added, RecognizeOutcome::Added]);
        let again = cache.add_events(vec![event(1)], 0).unwrap();
        assert_eq!(again, vec![RecognizeOutcome::Duplicate]);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_already_acknowledged_dropped() {
        let cache = cache();
        let outcomes = cache.add_events(vec![event(2), event(5)], 3).unwrap();
        assert_eq!(outcomes, vec![RecognizeOutcome::Duplicate, RecognizeOutcome::Added]);
    }

    #[test]
    fn test_consecutive_run_stops_at_gap() {
        let cache = cache();
        cache
            .add_events(vec![event(0), event(1), event(2), event(4)], 0)
            .unwrap();
        let ids: Vec<u32> = cache
            .get_events_to_acknowledge(0, 10)
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert!(cache.get_events_to_acknowledge(3, 10).is_empty());
    }

    #[test]
    fn test_run_bounded_by_max() {
        let cache = cache();
        cache.add_events((0..10).map(event).collect(), 0).unwrap();
        assert_eq!(cache.get_events_to_acknowledge(2, 3).len(), 3);
    }

    #[test]
    fn test_prune() {
        let cache = cache();
        cache.add_events((0..5).map(event).collect(), 0).unwrap();
        assert_eq!(cache.prune_acknowledged(3), 3);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_evicted_event_can_be_recognized_again() {
        let cache = cache();
        cache.add_events(vec![event(0), event(1)], 0).unwrap();
        assert_eq!(cache.evict(0).map(|e| e.id), Some(0));
        assert_eq!(cache.evict(0), None);
        assert!(!cache.contains(0));
        assert!(cache.get_events_to_acknowledge(0, 10).is_empty());

        let outcomes = cache.add_events(vec![event(0)], 0).unwrap();
        assert_eq!(outcomes, vec![RecognizeOutcome::Added]);
        assert_eq!(cache.get_events_to_acknowledge(0, 10).len(), 2);
    }

    #[test]
    fn test_rate_limited() {
        let cache = RecognizedEventCache::new(1, 0);
        cache.add_events(vec![event(0)], 0).unwrap();
        assert_eq!(
            cache.add_events(vec![event(1)], 0),
            Err(RecognizeError::RateLimited)
        );
    }
}
