//! # Ports
//!
//! - **Inbound (API)**: what the lifecycle driver calls
//! - **Outbound (SPI)**: the ledger the bridge moves funds through

pub mod inbound;
pub mod outbound;

pub use inbound::BridgeApi;
pub use outbound::BankKeeper;
