//! # Indexer Errors

use thiserror::Error;

/// Errors from the transient event log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexerError {
    /// Append attempted for a height the log was not opened at.
    #[error("event log is open at height {log_height}, append attempted at {ctx_height}")]
    HeightMismatch { log_height: u64, ctx_height: u64 },

    /// A new block was opened while events from the previous one remain.
    #[error("event log for height {height} still holds {pending} events")]
    LogNotCleared { height: u64, pending: usize },

    /// The log already holds as many events as a sequence number can address.
    #[error("event log for height {height} is full")]
    LogFull { height: u64 },

    /// Payload could not be serialized.
    #[error("failed to encode {subtype} event: {reason}")]
    Encode { subtype: String, reason: String },
}
