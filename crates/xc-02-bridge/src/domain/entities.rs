//! # Domain Entities
//!
//! Bridge events observed on the external chain.

use serde::{Deserialize, Serialize};
use shared_types::Coin;

/// A transfer observed on the external chain. Immutable once observed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeEvent {
    /// Externally assigned id; strictly increasing, consumed once.
    pub id: u32,
    /// Encoded recipient address on this chain.
    pub address: String,
    /// Amount to release.
    pub coin: Coin,
    /// External block the transfer was included in.
    pub eth_block_height: u64,
}

impl BridgeEvent {
    /// Create an event.
    pub fn new(id: u32, address: impl Into<String>, coin: Coin, eth_block_height: u64) -> Self {
        Self {
            id,
            address: address.into(),
            coin,
            eth_block_height,
        }
    }
}

/// Outcome of one due event processed at end block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BridgeOutcome {
    /// Event id.
    pub id: u32,
    /// Terminal status reached.
    pub status: super::BridgeEventStatus,
    /// Metric label of the rejection cause, if rejected.
    pub reason: Option<&'static str>,
}
