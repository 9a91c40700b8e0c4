//! # Bridge Events
//!
//! Payloads recorded under the `bridge` indexer subtype.

use serde::{Deserialize, Serialize};

/// Payload schema version of [`BridgeCompletedEvent`].
pub const BRIDGE_EVENT_VERSION: u32 = 1;

/// Emitted when a bridge event's funds reach the recipient.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeCompletedEvent {
    /// Bridge event id.
    pub id: u32,
    /// Encoded recipient address.
    pub address: String,
    /// Denom transferred.
    pub denom: String,
    /// Amount transferred.
    pub amount: u128,
}
