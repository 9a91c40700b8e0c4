//! # Transient Event Log
//!
//! Block-scoped arena of indexer events. Opened at one height, appended to
//! during execution, read by `produce_block`, and cleared by the lifecycle
//! driver before the next block opens.

use crate::errors::IndexerError;
use crate::events::{EventOrigin, IndexerEvent};

/// Append-only log for exactly one block height.
#[derive(Debug, Clone, Default)]
pub struct TransientEventLog {
    height: u64,
    events: Vec<IndexerEvent>,
}

impl TransientEventLog {
    /// Create an empty log opened at `height`.
    pub fn new(height: u64) -> Self {
        Self {
            height,
            events: Vec::new(),
        }
    }

    /// Re-open the log at a new height. Fails if events are still pending.
    pub fn open(&mut self, height: u64) -> Result<(), IndexerError> {
        if !self.events.is_empty() {
            return Err(IndexerError::LogNotCleared {
                height: self.height,
                pending: self.events.len(),
            });
        }
        self.height = height;
        Ok(())
    }

    /// Append an encoded event; returns its sequence number.
    pub fn append(
        &mut self,
        height: u64,
        subtype: &str,
        version: u32,
        data_bytes: Vec<u8>,
        origin: EventOrigin,
    ) -> Result<u32, IndexerError> {
        if height != self.height {
            return Err(IndexerError::HeightMismatch {
                log_height: self.height,
                ctx_height: height,
            });
        }
        let sequence = next_sequence(self.height, self.events.len())?;
        self.events.push(IndexerEvent {
            sequence,
            subtype: subtype.to_string(),
            version,
            data_bytes,
            origin,
        });
        Ok(sequence)
    }

    /// Height the log is open at.
    pub fn height(&self) -> u64 {
        self.height
    }

    /// Events in append order.
    pub fn events(&self) -> &[IndexerEvent] {
        &self.events
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if nothing was appended since the last clear.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Mark the current end of the log.
    pub fn checkpoint(&self) -> usize {
        self.events.len()
    }

    /// Drop everything appended after `checkpoint`.
    pub fn rollback_to(&mut self, checkpoint: usize) {
        self.events.truncate(checkpoint);
    }

    /// Drop every event. Called by the lifecycle driver after the batch
    /// has been produced and shipped.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

/// Sequence number of the event appended after `len` others.
fn next_sequence(height: u64, len: usize) -> Result<u32, IndexerError> {
    u32::try_from(len).map_err(|_| IndexerError::LogFull { height })
}
