//! # Daemons
//!
//! Off-chain producers feeding the per-validator ingestion caches. Each
//! daemon is a `tokio` task polling its source every `loop_delay_ms` and
//! pushing results into a cache; the proposer reads the caches when it
//! builds a block.
//!
//! Daemon failures are local: they are logged, retried with bounded
//! exponential backoff, and at worst leave the cache stale.

pub mod bridge;
pub mod exchange;
pub mod metrics_server;
pub mod price;

pub use bridge::{BridgeDaemon, EthEventSource, SimulatedEthChain};
pub use exchange::{ExchangeQuerier, SimulatedExchange};
pub use metrics_server::serve_metrics;
pub use price::PriceDaemon;

use std::future::Future;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::{debug, warn};

/// Upper bound for a single backoff sleep.
pub const MAX_BACKOFF_MS: u64 = 10_000;

/// Daemon errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DaemonError {
    /// The external source could not be reached or answered garbage.
    #[error("source {source_name} unavailable: {reason}")]
    SourceUnavailable {
        /// Exchange or RPC endpoint.
        source_name: String,
        /// Cause.
        reason: String,
    },

    /// The source has no data for this market.
    #[error("market {0} not supported")]
    UnsupportedMarket(u32),

    /// The ingestion cache refused the push.
    #[error("submission rejected: {0}")]
    Submission(String),
}

/// Bounded exponential backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry; doubled each retry.
    pub base_delay_ms: u64,
}

impl RetryPolicy {
    /// Policy from attempt count and base delay.
    pub fn new(max_attempts: u32, base_delay_ms: u64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay_ms,
        }
    }

    /// Sleep before retry number `retry` (0-based), capped at
    /// [`MAX_BACKOFF_MS`].
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 1u64.checked_shl(retry).unwrap_or(u64::MAX);
        Duration::from_millis(self.base_delay_ms.saturating_mul(factor).min(MAX_BACKOFF_MS))
    }
}

/// Run `op` until it succeeds or the policy is exhausted. Returns the last
/// error on exhaustion.
pub async fn retry_with_backoff<T, E, F, Fut>(
    policy: RetryPolicy,
    label: &str,
    mut op: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut retry = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if retry + 1 >= policy.max_attempts => {
                warn!(attempts = retry + 1, "[runtime] {} failed, giving up: {}", label, e);
                return Err(e);
            }
            Err(e) => {
                let delay = policy.delay_for(retry);
                debug!(
                    attempt = retry + 1,
                    delay_ms = delay.as_millis() as u64,
                    "[runtime] {} failed, retrying: {}",
                    label,
                    e
                );
                tokio::time::sleep(delay).await;
                retry += 1;
            }
        }
    }
}

/// Wall-clock unix milliseconds. Daemon side only.
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy::new(5, 200);
        assert_eq!(policy.delay_for(0), Duration::from_millis(200));
        assert_eq!(policy.delay_for(1), Duration::from_millis(400));
        assert_eq!(policy.delay_for(3), Duration::from_millis(1_600));
        assert_eq!(policy.delay_for(10), Duration::from_millis(MAX_BACKOFF_MS));
        assert_eq!(policy.delay_for(200), Duration::from_millis(MAX_BACKOFF_MS));
    }

    #[test]
    fn test_zero_attempts_means_one() {
        assert_eq!(RetryPolicy::new(0, 10).max_attempts, 1);
    }

    #[tokio::test]
    async fn test_retry_succeeds_after_failures() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, String> = retry_with_backoff(RetryPolicy::new(5, 1), "op", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(format!("fail {}", n))
                } else {
                    Ok(n)
                }
            }
        })
        .await;
        assert_eq!(result, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_gives_up() {
        let calls = AtomicU32::new(0);
        let result: Result<(), String> = retry_with_backoff(RetryPolicy::new(3, 1), "op", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err("down".to_string()) }
        })
        .await;
        assert_eq!(result, Err("down".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
