//! Market creation and param updates.

use super::MarketPriceKeeper;
use crate::domain::{
    validate_market_param, validate_price_exponent, MarketId, MarketParam, MarketPrice,
    PricesError,
};
use crate::events::MarketEvent;
use shared_indexer::BlockContext;
use shared_types::Address;
use tracing::info;

impl MarketPriceKeeper {
    pub(super) fn create_market_internal(
        &mut self,
        ctx: &mut BlockContext,
        mut param: MarketParam,
        mut price: MarketPrice,
    ) -> Result<MarketId, PricesError> {
        let id = self.next_market_id;
        param.id = id;
        price.id = id;

        validate_market_param(&param)?;
        validate_price_exponent(&param, &price)?;
        self.ensure_unique_pair(&param.pair, None)?;

        let event = MarketEvent::create(id, &param.pair, param.min_price_change_ppm, param.exponent);
        self.emit(ctx, &event)?;

        self.smoothed.push(id, price.price);
        info!(
            market_id = id,
            pair = %param.pair,
            price = price.price,
            "[xc-01] market created"
        );
        self.params.insert(id, param);
        self.prices.insert(id, price);
        self.next_market_id = id.saturating_add(1);
        Ok(id)
    }

    pub(super) fn update_market_param_internal(
        &mut self,
        ctx: &mut BlockContext,
        caller: &Address,
        id: MarketId,
        mut param: MarketParam,
    ) -> Result<MarketParam, PricesError> {
        self.authorities.ensure(caller)?;

        let existing = self
            .params
            .get(&id)
            .ok_or(PricesError::MarketNotFound(id))?;
        param.id = id;

        if param.exponent != existing.exponent {
            return Err(PricesError::InvalidInput(format!(
                "market {} exponent cannot be changed from {} to {}",
                id, existing.exponent, param.exponent
            )));
        }
        validate_market_param(&param)?;
        self.ensure_unique_pair(&param.pair, Some(id))?;

        let event = MarketEvent::modify(id, &param.pair, param.min_price_change_ppm);
        self.emit(ctx, &event)?;

        info!(market_id = id, pair = %param.pair, "[xc-01] market param updated");
        self.params.insert(id, param.clone());
        Ok(param)
    }

    fn ensure_unique_pair(&self, pair: &str, except: Option<MarketId>) -> Result<(), PricesError> {
        let taken = self
            .params
            .values()
            .any(|p| p.pair == pair && Some(p.id) != except);
        if taken {
            return Err(PricesError::InvalidInput(format!(
                "pair {} already exists",
                pair
            )));
        }
        Ok(())
    }
}
