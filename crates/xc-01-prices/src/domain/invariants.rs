//! # Domain Invariants
//!
//! Structural checks on market params. Run before any state mutation.

use super::entities::{MarketParam, MarketPrice};
use super::errors::PricesError;

/// Upper bound (exclusive) for `min_price_change_ppm`. 1% of the price.
pub const MAX_PRICE_CHANGE_PPM: u32 = 10_000;

/// Validate a market param in isolation.
///
/// Pair uniqueness needs the full market set and is checked by the keeper.
pub fn validate_market_param(param: &MarketParam) -> Result<(), PricesError> {
    if param.pair.trim().is_empty() {
        return Err(PricesError::InvalidInput("pair cannot be empty".into()));
    }
    if param.min_exchanges == 0 {
        return Err(PricesError::InvalidInput(
            "min exchanges must be greater than zero".into(),
        ));
    }
    if param.min_price_change_ppm == 0 || param.min_price_change_ppm >= MAX_PRICE_CHANGE_PPM {
        return Err(PricesError::InvalidInput(format!(
            "min price change in ppm must be in (0, {}), got {}",
            MAX_PRICE_CHANGE_PPM, param.min_price_change_ppm
        )));
    }
    validate_exchange_config_json(&param.exchange_config_json)
}

/// Exchange config must be syntactically valid JSON. Empty object is fine.
pub fn validate_exchange_config_json(json: &str) -> Result<(), PricesError> {
    serde_json::from_str::<serde_json::Value>(json)
        .map(|_| ())
        .map_err(|e| PricesError::InvalidInput(format!("invalid exchange config json: {}", e)))
}

/// The price must be expressed in the market's exponent.
pub fn validate_price_exponent(param: &MarketParam, price: &MarketPrice) -> Result<(), PricesError> {
    if param.exponent != price.exponent {
        return Err(PricesError::InvalidInput(format!(
            "market param {} exponent {} does not match market price {} exponent {}",
            param.id, param.exponent, price.id, price.exponent
        )));
    }
    Ok(())
}
