//! Exchange price sources for the price daemon.

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::Rng;
use std::collections::BTreeMap;
use xc_01_prices::MarketId;

use super::DaemonError;

/// One exchange's spot price feed.
#[async_trait]
pub trait ExchangeQuerier: Send + Sync {
    /// Exchange name; keys the per-exchange slot in the price cache.
    fn name(&self) -> &str;

    /// Latest price of `market_id`, in the market's exponent.
    async fn query_price(&self, market_id: MarketId) -> Result<u64, DaemonError>;
}

/// Random-walk price feed for local networks.
pub struct SimulatedExchange {
    name: String,
    prices: Mutex<BTreeMap<MarketId, u64>>,
    max_step_ppm: u32,
    failure_rate: f64,
}

impl SimulatedExchange {
    /// Feed starting at `initial` prices, moving at most `max_step_ppm` per
    /// query.
    pub fn new(
        name: impl Into<String>,
        initial: impl IntoIterator<Item = (MarketId, u64)>,
        max_step_ppm: u32,
    ) -> Self {
        Self {
            name: name.into(),
            prices: Mutex::new(initial.into_iter().collect()),
            max_step_ppm,
            failure_rate: 0.0,
        }
    }

    /// Fail this fraction of queries.
    pub fn with_failure_rate(mut self, failure_rate: f64) -> Self {
        self.failure_rate = failure_rate.clamp(0.0, 1.0);
        self
    }
}

#[async_trait]
impl ExchangeQuerier for SimulatedExchange {
    fn name(&self) -> &str {
        &self.name
    }

    async fn query_price(&self, market_id: MarketId) -> Result<u64, DaemonError> {
        let mut rng = rand::thread_rng();
        if self.failure_rate > 0.0 && rng.gen_bool(self.failure_rate) {
            return Err(DaemonError::SourceUnavailable {
                source_name: self.name.clone(),
                reason: "simulated outage".to_string(),
            });
        }

        let mut prices = self.prices.lock();
        let price = prices
            .get_mut(&market_id)
            .ok_or(DaemonError::UnsupportedMarket(market_id))?;
        let step = i64::from(self.max_step_ppm);
        let delta_ppm = if step == 0 { 0 } else { rng.gen_range(-step..=step) };
        let delta = (i128::from(*price) * i128::from(delta_ppm)) / 1_000_000;
        let next = (i128::from(*price) + delta).clamp(1, i128::from(u64::MAX));
        *price = u64::try_from(next).unwrap_or(*price);
        Ok(*price)
    }
}
