//! # Market Events
//!
//! Payloads recorded under the `market` indexer subtype.

use crate::domain::MarketId;
use serde::{Deserialize, Serialize};

/// Payload schema version of [`MarketEvent`].
pub const MARKET_EVENT_VERSION: u32 = 1;

/// Market event as shipped to the indexer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketEvent {
    /// Market the event refers to.
    pub market_id: MarketId,
    /// What happened.
    pub event: MarketEventKind,
}

/// Market event variants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketEventKind {
    /// A market was created.
    MarketCreate {
        /// Pair symbol.
        pair: String,
        /// Update threshold in ppm.
        min_price_change_ppm: u32,
        /// Price exponent.
        exponent: i32,
    },
    /// Governance changed a market's params.
    MarketModify {
        /// Pair symbol.
        pair: String,
        /// Update threshold in ppm.
        min_price_change_ppm: u32,
    },
    /// A price update cleared the threshold and was written.
    PriceUpdate {
        /// New scaled price.
        price_with_exponent: u64,
    },
}

impl MarketEvent {
    /// Market-create event.
    pub fn create(market_id: MarketId, pair: &str, min_price_change_ppm: u32, exponent: i32) -> Self {
        Self {
            market_id,
            event: MarketEventKind::MarketCreate {
                pair: pair.to_string(),
                min_price_change_ppm,
                exponent,
            },
        }
    }

    /// Market-modify event.
    pub fn modify(market_id: MarketId, pair: &str, min_price_change_ppm: u32) -> Self {
        Self {
            market_id,
            event: MarketEventKind::MarketModify {
                pair: pair.to_string(),
                min_price_change_ppm,
            },
        }
    }

    /// Price-update event.
    pub fn price_update(market_id: MarketId, price_with_exponent: u64) -> Self {
        Self {
            market_id,
            event: MarketEventKind::PriceUpdate {
                price_with_exponent,
            },
        }
    }
}
