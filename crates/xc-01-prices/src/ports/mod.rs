//! # Ports
//!
//! - **Inbound (API)**: what the lifecycle driver calls
//! - **Outbound (SPI)**: where proposer-side exchange prices come from

pub mod inbound;
pub mod outbound;

pub use inbound::MarketPricesApi;
pub use outbound::{IndexPriceSource, MockPriceSource};
