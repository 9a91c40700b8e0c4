//! Per-block price updates and proposer candidates.

use super::MarketPriceKeeper;
use crate::algorithms::{is_above_min_price_change, median};
use crate::domain::{MarketPrice, MarketPriceUpdate, PricesError};
use crate::events::MarketEvent;
use crate::ports::IndexPriceSource;
use shared_indexer::BlockContext;
use std::collections::BTreeSet;
use tracing::{debug, info};

impl MarketPriceKeeper {
    pub(super) fn update_market_prices_internal(
        &mut self,
        ctx: &mut BlockContext,
        updates: &[MarketPriceUpdate],
    ) -> Result<Vec<MarketPrice>, PricesError> {
        // Structural pass over the whole batch before anything is written.
        let mut seen = BTreeSet::new();
        for update in updates {
            if !self.prices.contains_key(&update.market_id) {
                return Err(PricesError::MarketNotFound(update.market_id));
            }
            if !seen.insert(update.market_id) {
                return Err(PricesError::InvalidInput(format!(
                    "market {} appears more than once in price update batch",
                    update.market_id
                )));
            }
        }

        let mut accepted = Vec::with_capacity(updates.len());
        for update in updates {
            let (param, current) = match (
                self.params.get(&update.market_id),
                self.prices.get(&update.market_id),
            ) {
                (Some(param), Some(current)) => (param, current),
                _ => return Err(PricesError::MarketNotFound(update.market_id)),
            };
            if is_above_min_price_change(current.price, update.price, param.min_price_change_ppm) {
                accepted.push(MarketPrice {
                    id: update.market_id,
                    exponent: current.exponent,
                    price: update.price,
                });
            } else {
                debug!(
                    market_id = update.market_id,
                    old = current.price,
                    new = update.price,
                    min_ppm = param.min_price_change_ppm,
                    "[xc-01] price update below threshold, skipped"
                );
            }
        }

        let checkpoint = ctx.log().checkpoint();
        for price in &accepted {
            if let Err(e) = self.emit(ctx, &MarketEvent::price_update(price.id, price.price)) {
                ctx.log_mut().rollback_to(checkpoint);
                return Err(e);
            }
        }

        for price in &accepted {
            info!(
                market_id = price.id,
                price = price.price,
                "[xc-01] market price updated"
            );
            self.smoothed.push(price.id, price.price);
            self.prices.insert(price.id, price.clone());
        }
        Ok(accepted)
    }

    /// Candidate updates for the proposer, ordered by market id.
    ///
    /// A market yields a candidate when at least `min_exchanges` fresh prices
    /// exist and their median clears the market's ppm threshold.
    pub fn get_valid_market_price_updates(
        &self,
        source: &dyn IndexPriceSource,
        now_ms: u64,
    ) -> Vec<MarketPriceUpdate> {
        let mut updates = Vec::new();
        for (id, param) in &self.params {
            let Some(current) = self.prices.get(id) else {
                continue;
            };
            let fresh = source.fresh_prices(*id, now_ms);
            if fresh.len() < param.min_exchanges as usize {
                debug!(
                    market_id = id,
                    reported = fresh.len(),
                    required = param.min_exchanges,
                    "[xc-01] not enough exchange prices"
                );
                continue;
            }
            let Some(index_price) = median(&fresh) else {
                continue;
            };
            if is_above_min_price_change(current.price, index_price, param.min_price_change_ppm) {
                updates.push(MarketPriceUpdate::new(*id, index_price));
            }
        }
        updates
    }
}
