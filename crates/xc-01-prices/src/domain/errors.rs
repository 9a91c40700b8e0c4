//! # Domain Errors
//!
//! Error types for Oracle Prices. Every variant is raised before any state
//! is touched, so identical input fails identically on every validator.

use super::entities::MarketId;
use shared_indexer::IndexerError;
use shared_types::AuthorityError;
use thiserror::Error;

/// Oracle price errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricesError {
    /// Structurally invalid input (empty pair, bad JSON, bad thresholds...).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Market id does not exist.
    #[error("Market not found: {0}")]
    MarketNotFound(MarketId),

    /// Caller is not in the authority set.
    #[error(transparent)]
    Unauthorized(#[from] AuthorityError),

    /// Event could not be recorded.
    #[error(transparent)]
    Indexer(#[from] IndexerError),
}

/// Daemon ingestion errors. Local to a validator, never consensus-relevant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    /// Ingestion point is rate limited; the daemon should back off.
    #[error("Price ingestion rate limited")]
    RateLimited,

    /// A zero price was pushed.
    #[error("Invalid exchange price for market {market_id} from {exchange}")]
    InvalidPrice {
        /// Target market.
        market_id: MarketId,
        /// Reporting exchange.
        exchange: String,
    },
}
