//! # Indexer Event Manager
//!
//! Keepers record events through the manager; the lifecycle driver asks it
//! for the block batch and ships it through the configured sender.

use crate::context::{BlockContext, ExecPhase};
use crate::errors::IndexerError;
use crate::events::{EventOrigin, IndexerBlock};
use crate::sender::IndexerMessageSender;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, trace};

/// Records events into the block context and produces the per-block batch.
///
/// Holds no per-block state itself; the log lives in the `BlockContext`, so
/// cloning the manager into several keepers is cheap.
#[derive(Clone)]
pub struct IndexerEventManager {
    sender: Arc<dyn IndexerMessageSender>,
}

impl IndexerEventManager {
    /// Create a manager shipping batches through `sender`.
    pub fn new(sender: Arc<dyn IndexerMessageSender>) -> Self {
        Self { sender }
    }

    /// Whether produced batches are shipped anywhere.
    pub fn enabled(&self) -> bool {
        self.sender.enabled()
    }

    /// Append an event with an explicit origin. Returns its sequence number.
    pub fn add_event<T: Serialize>(
        &self,
        ctx: &mut BlockContext,
        subtype: &str,
        version: u32,
        payload: &T,
        origin: EventOrigin,
    ) -> Result<u32, IndexerError> {
        let data_bytes = serde_json::to_vec(payload).map_err(|e| IndexerError::Encode {
            subtype: subtype.to_string(),
            reason: e.to_string(),
        })?;
        let height = ctx.height();
        let sequence = ctx
            .log_mut()
            .append(height, subtype, version, data_bytes, origin)?;

        trace!(
            "[indexer] event #{} {} v{} at height {} ({:?})",
            sequence,
            subtype,
            version,
            height,
            origin
        );
        Ok(sequence)
    }

    /// Append an event attributed to whatever phase the context is in.
    pub fn add_txn_event<T: Serialize>(
        &self,
        ctx: &mut BlockContext,
        subtype: &str,
        version: u32,
        payload: &T,
    ) -> Result<u32, IndexerError> {
        let origin = match ctx.phase() {
            ExecPhase::BeginBlock => EventOrigin::BeginBlock,
            ExecPhase::Transaction(tx_index) => EventOrigin::Transaction { tx_index },
            ExecPhase::EndBlock => EventOrigin::EndBlock,
        };
        self.add_event(ctx, subtype, version, payload, origin)
    }

    /// Append an end-of-block event.
    pub fn add_block_event<T: Serialize>(
        &self,
        ctx: &mut BlockContext,
        subtype: &str,
        version: u32,
        payload: &T,
    ) -> Result<u32, IndexerError> {
        self.add_event(ctx, subtype, version, payload, EventOrigin::EndBlock)
    }

    /// Snapshot the block's log as one ordered batch.
    ///
    /// Read-only: calling it twice without intervening appends yields equal
    /// batches. Clearing is the lifecycle driver's job.
    pub fn produce_block(&self, ctx: &BlockContext) -> IndexerBlock {
        IndexerBlock {
            height: ctx.height(),
            time_ms: ctx.time_ms(),
            events: ctx.log().events().to_vec(),
        }
    }

    /// Hand a produced batch to the sender, if enabled.
    pub fn send_onchain_data(&self, block: IndexerBlock) {
        if !self.sender.enabled() {
            debug!("[indexer] sender disabled, dropping block {}", block.height);
            return;
        }
        debug!(
            height = block.height,
            events = block.events.len(),
            "[indexer] shipping block"
        );
        self.sender.send_onchain_data(block);
    }
}
