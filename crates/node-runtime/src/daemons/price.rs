//! Price daemon: polls every exchange for every market and caches the
//! results for the proposer.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use xc_01_prices::{ExchangeMarketPriceCache, IngestError, IngestOutcome, MarketId};

use super::{retry_with_backoff, unix_millis, DaemonError, ExchangeQuerier, RetryPolicy};

/// Exchange price poller.
pub struct PriceDaemon {
    exchanges: Vec<Arc<dyn ExchangeQuerier>>,
    markets: Vec<MarketId>,
    cache: Arc<ExchangeMarketPriceCache>,
    loop_delay: Duration,
    retry: RetryPolicy,
}

impl PriceDaemon {
    /// Create a daemon polling `markets` on `exchanges`.
    pub fn new(
        exchanges: Vec<Arc<dyn ExchangeQuerier>>,
        markets: Vec<MarketId>,
        cache: Arc<ExchangeMarketPriceCache>,
        loop_delay_ms: u64,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            exchanges,
            markets,
            cache,
            loop_delay: Duration::from_millis(loop_delay_ms),
            retry,
        }
    }

    /// One polling round at `now_ms`. Returns how many prices were accepted.
    pub async fn run_once(&self, now_ms: u64) -> usize {
        let mut accepted = 0;
        for exchange in &self.exchanges {
            for &market_id in &self.markets {
                let label = format!("query {} market {}", exchange.name(), market_id);
                let price = match retry_with_backoff(self.retry, &label, || {
                    exchange.query_price(market_id)
                })
                .await
                {
                    Ok(price) => price,
                    Err(DaemonError::UnsupportedMarket(_)) => continue,
                    Err(e) => {
                        warn!(exchange = exchange.name(), market_id, "[xc-01] price query failed: {}", e);
                        continue;
                    }
                };

                let submit = retry_with_backoff(self.retry, "submit exchange price", || async move {
                    self.cache.push(market_id, exchange.name(), price, now_ms)
                })
                .await;
                match submit {
                    Ok(IngestOutcome::Accepted) => accepted += 1,
                    Ok(IngestOutcome::Stale) => {}
                    Err(IngestError::RateLimited) => {
                        warn!("[xc-01] price submissions rate limited, ending round early");
                        return accepted;
                    }
                    Err(e) => warn!(exchange = exchange.name(), market_id, "[xc-01] price rejected: {}", e),
                }
            }
        }
        debug!(accepted, "[xc-01] price daemon round done");
        accepted
    }

    /// Poll until `shutdown` flips.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(
            exchanges = self.exchanges.len(),
            markets = self.markets.len(),
            loop_delay_ms = self.loop_delay.as_millis() as u64,
            "[xc-01] price daemon started"
        );
        let mut interval = tokio::time::interval(self.loop_delay);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.run_once(unix_millis()).await;
                    self.cache.prune(unix_millis());
                }
                _ = shutdown.changed() => {
                    info!("[xc-01] price daemon shutting down");
                    break;
                }
            }
        }
    }
}
