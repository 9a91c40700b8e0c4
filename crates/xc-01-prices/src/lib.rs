//! # XC-01 Oracle Prices
//!
//! Turns externally-sourced spot prices into one canonical, deterministic
//! on-chain price per market.
//!
//! **Subsystem ID:** 1
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Flow
//!
//! ```text
//!  price daemons ──push──▶ ExchangeMarketPriceCache  (per validator, not consensus)
//!                                   │
//!                       get_valid_market_price_updates (proposer)
//!                                   ▼
//!                       update_market_prices (every validator)
//!                         │ ppm threshold │ skip silently
//!                         ▼               ▼
//!                 MarketPrice + SmoothedPriceHistory + indexer event
//! ```
//!
//! ## Determinism
//!
//! | Rule | Where |
//! |------|-------|
//! | Integer ppm arithmetic only | `algorithms::price_change` |
//! | Order-independent median | `algorithms::median` |
//! | Whole batch rejected on unknown / duplicate id | `service::prices` |
//! | Wall-clock only in the daemon-facing cache | `adapters::exchange_price_cache` |

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod domain;
pub mod events;
pub mod ports;
pub mod service;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use adapters::{ExchangeMarketPriceCache, IngestOutcome};
pub use algorithms::{is_above_min_price_change, median, price_change_ppm};
pub use domain::{
    validate_market_param, IngestError, MarketId, MarketParam, MarketParamPrice, MarketPrice,
    MarketPriceUpdate, MarketToSmoothedPrices, PriceHistory, PricesConfig, PricesError,
    MAX_PRICE_CHANGE_PPM, SMOOTHED_PRICE_HISTORY_LENGTH,
};
pub use events::{MarketEvent, MarketEventKind, MARKET_EVENT_VERSION};
pub use ports::{IndexPriceSource, MarketPricesApi};
pub use service::MarketPriceKeeper;

/// Module name; also seeds the module account address.
pub const MODULE_NAME: &str = "prices";
