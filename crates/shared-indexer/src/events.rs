//! # Indexer Events
//!
//! Wire shapes of the batch handed to the off-chain indexer. Payloads are
//! typed structs owned by the emitting keeper, serialized with `serde_json`
//! and tagged with a subtype and a per-subtype version.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Market create / modify / price-update events.
pub const SUBTYPE_MARKET: &str = "market";

/// Bridge completion events.
pub const SUBTYPE_BRIDGE: &str = "bridge";

/// Where in the block an event was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventOrigin {
    /// Recorded while running begin-block logic.
    BeginBlock,
    /// Recorded by the transaction at `tx_index` within the block.
    Transaction { tx_index: u32 },
    /// Recorded while running end-block logic.
    EndBlock,
}

/// One entry of the transient log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexerEvent {
    /// Monotonic in-block sequence number (0-based, append order).
    pub sequence: u32,
    /// Event subtype, e.g. [`SUBTYPE_MARKET`].
    pub subtype: String,
    /// Payload schema version for this subtype.
    pub version: u32,
    /// `serde_json` encoded payload.
    pub data_bytes: Vec<u8>,
    /// Phase of the block that recorded the event.
    pub origin: EventOrigin,
}

impl IndexerEvent {
    /// Decode the payload into its typed form.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.data_bytes)
    }
}

/// Ordered batch produced once per block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexerBlock {
    /// Block height the events belong to.
    pub height: u64,
    /// Block time in unix milliseconds.
    pub time_ms: u64,
    /// Events in exact append order.
    pub events: Vec<IndexerEvent>,
}

impl IndexerBlock {
    /// Events of a single subtype, preserving order.
    pub fn events_of<'a>(&'a self, subtype: &'a str) -> impl Iterator<Item = &'a IndexerEvent> {
        self.events.iter().filter(move |e| e.subtype == subtype)
    }

    /// Decode every event of `subtype` into `T`.
    pub fn decode_all<T: DeserializeOwned>(&self, subtype: &str) -> Result<Vec<T>, serde_json::Error> {
        self.events_of(subtype).map(IndexerEvent::decode).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Payload {
        id: u32,
    }

    #[test]
    fn test_decode_payload() {
        let event = IndexerEvent {
            sequence: 0,
            subtype: SUBTYPE_MARKET.to_string(),
            version: 1,
            data_bytes: serde_json::to_vec(&Payload { id: 7 }).unwrap(),
            origin: EventOrigin::EndBlock,
        };
        assert_eq!(event.decode::<Payload>().unwrap(), Payload { id: 7 });
    }

    #[test]
    fn test_events_of_filters_by_subtype() {
        let make = |sequence: u32, subtype: &str| IndexerEvent {
            sequence,
            subtype: subtype.to_string(),
            version: 1,
            data_bytes: serde_json::to_vec(&Payload { id: sequence }).unwrap(),
            origin: EventOrigin::Transaction { tx_index: 0 },
        };
        let block = IndexerBlock {
            height: 3,
            time_ms: 0,
            events: vec![
                make(0, SUBTYPE_MARKET),
                make(1, SUBTYPE_BRIDGE),
                make(2, SUBTYPE_MARKET),
            ],
        };
        let markets: Vec<Payload> = block.decode_all(SUBTYPE_MARKET).unwrap();
        assert_eq!(markets, vec![Payload { id: 0 }, Payload { id: 2 }]);
    }
}
