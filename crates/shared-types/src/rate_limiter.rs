//! # Rate Limiter
//!
//! Token bucket guarding the daemon ingestion points (price pushes, bridge
//! observations). Lives strictly outside block execution: wall-clock time
//! only decides whether a daemon submission is accepted into a local cache,
//! never what the chain does with it.

use parking_lot::Mutex;
use std::time::Instant;

/// Token bucket rate limiter.
///
/// - Tokens are added at `refill_rate` per second, up to `capacity`
/// - Each accepted submission consumes one token
/// - Submissions are rejected when the bucket is empty
pub struct RateLimiter {
    capacity: u64,
    refill_rate: u64,
    state: Mutex<Bucket>,
}

struct Bucket {
    tokens: u64,
    last_refill: Instant,
}

impl RateLimiter {
    /// Create a full bucket.
    ///
    /// - `capacity`: maximum burst size
    /// - `refill_rate`: tokens per second
    pub fn new(capacity: u64, refill_rate: u64) -> Self {
        Self {
            capacity,
            refill_rate,
            state: Mutex::new(Bucket {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
        }
    }

    /// Try to take a token. Returns `false` when rate limited.
    pub fn try_acquire(&self) -> bool {
        let mut bucket = self.state.lock();
        self.refill(&mut bucket);
        if bucket.tokens == 0 {
            return false;
        }
        bucket.tokens -= 1;
        true
    }

    /// Tokens currently available.
    pub fn available(&self) -> u64 {
        let mut bucket = self.state.lock();
        self.refill(&mut bucket);
        bucket.tokens
    }

    /// Check if rate limited without consuming a token.
    pub fn is_limited(&self) -> bool {
        self.available() == 0
    }

    fn refill(&self, bucket: &mut Bucket) {
        let elapsed_ms = bucket.last_refill.elapsed().as_millis() as u64;
        let tokens_to_add = elapsed_ms.saturating_mul(self.refill_rate) / 1_000;
        if tokens_to_add > 0 {
            bucket.tokens = bucket.tokens.saturating_add(tokens_to_add).min(self.capacity);
            bucket.last_refill = Instant::now();
        }
    }
}
