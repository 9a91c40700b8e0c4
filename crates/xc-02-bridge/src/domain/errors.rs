//! # Domain Errors
//!
//! Error types for Bridge Completion.

use shared_indexer::IndexerError;
use shared_types::{AddressError, AuthorityError, CoinError};
use thiserror::Error;

/// Bridge errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// Kill switch is engaged.
    #[error("Bridging is disabled")]
    BridgingDisabled,

    /// Coin amount not positive, denom malformed or not the bridge denom.
    #[error("invalid coin: {0}")]
    InvalidCoin(String),

    /// Recipient address could not be decoded.
    #[error("invalid address: {0}")]
    InvalidAddress(#[from] AddressError),

    /// Custodial account cannot cover the transfer.
    #[error("insufficient funds: {0}")]
    InsufficientFunds(String),

    /// Caller is not in the authority set.
    #[error(transparent)]
    Unauthorized(#[from] AuthorityError),

    /// Acknowledged id is not the expected next id.
    #[error("unexpected bridge event id: expected {expected}, got {got}")]
    UnexpectedEventId {
        /// Expected id.
        expected: u32,
        /// Id supplied.
        got: u32,
    },

    /// External block height went backwards.
    #[error("invalid eth block height: {got} is below last acknowledged {last}")]
    InvalidEthBlockHeight {
        /// Last acknowledged height.
        last: u64,
        /// Height supplied.
        got: u64,
    },

    /// Event could not be recorded.
    #[error(transparent)]
    Indexer(#[from] IndexerError),
}

impl From<CoinError> for BridgeError {
    fn from(e: CoinError) -> Self {
        BridgeError::InvalidCoin(e.to_string())
    }
}

impl From<BankError> for BridgeError {
    fn from(e: BankError) -> Self {
        match &e {
            BankError::InsufficientFunds { .. } => BridgeError::InsufficientFunds(e.to_string()),
            BankError::InvalidCoin(inner) => BridgeError::InvalidCoin(inner.to_string()),
        }
    }
}

impl BridgeError {
    /// Short label for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            BridgeError::BridgingDisabled => "disabled",
            BridgeError::InvalidCoin(_) => "invalid_coin",
            BridgeError::InvalidAddress(_) => "invalid_address",
            BridgeError::InsufficientFunds(_) => "insufficient_funds",
            BridgeError::Unauthorized(_) => "unauthorized",
            BridgeError::UnexpectedEventId { .. } => "unexpected_id",
            BridgeError::InvalidEthBlockHeight { .. } => "invalid_eth_height",
            BridgeError::Indexer(_) => "indexer",
        }
    }
}

/// Ledger errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BankError {
    /// Sender balance is below the transfer amount.
    #[error("{address} has {balance}{denom}, needs {required}{denom}")]
    InsufficientFunds {
        /// Encoded sender address.
        address: String,
        /// Denom transferred.
        denom: String,
        /// Sender balance.
        balance: u128,
        /// Amount requested.
        required: u128,
    },

    /// Coin failed validation.
    #[error(transparent)]
    InvalidCoin(#[from] CoinError),
}
