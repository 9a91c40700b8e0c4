//! # Shared Indexer - Per-Block Event Stream for the Off-Chain Indexer
//!
//! Every keeper records domain events (market created, price updated, bridge
//! completed) into a transient, block-scoped log. At the end of the block the
//! lifecycle driver asks the manager for one ordered batch and hands it to an
//! `IndexerMessageSender`.
//!
//! ## Block Lifecycle
//!
//! ```text
//!  begin_block(h)          apply_tx*            end_block          commit
//! ┌──────────────┐   ┌──────────────────┐   ┌─────────────┐   ┌──────────────┐
//! │ log opened   │──▶│ add_txn_event()  │──▶│ add_block_  │──▶│ produce_block│
//! │ at height h  │   │ (checkpoint /    │   │ event()     │   │ send, clear  │
//! └──────────────┘   │  rollback per tx)│   └─────────────┘   └──────────────┘
//!                    └──────────────────┘
//! ```
//!
//! ## Guarantees
//!
//! - **Append order:** the produced batch preserves exact append order
//! - **Idempotent reads:** `produce_block` never mutates the log
//! - **Single height:** the log refuses appends for any other height, and a
//!   new block cannot open on a log that was not cleared

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod context;
pub mod errors;
pub mod events;
pub mod manager;
pub mod sender;
pub mod transient;

pub use context::{BlockContext, ExecPhase};
pub use errors::IndexerError;
pub use events::{
    EventOrigin, IndexerBlock, IndexerEvent, SUBTYPE_BRIDGE, SUBTYPE_MARKET,
};
pub use manager::IndexerEventManager;
pub use sender::{
    IndexerMessageSender, IndexerSubscription, InMemoryIndexerSender, NoopIndexerSender,
    SubscriptionError,
};
pub use transient::TransientEventLog;

/// Maximum produced blocks buffered per subscriber before lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
