//! # Adapters
//!
//! Daemon-facing implementations of the outbound ports.

pub mod exchange_price_cache;

pub use exchange_price_cache::{ExchangeMarketPriceCache, IngestOutcome};
