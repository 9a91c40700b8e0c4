//! # Error Types
//!
//! Deterministic validation errors shared by the keeper crates.

use thiserror::Error;

/// Errors decoding a human-readable address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// Address string is empty.
    #[error("empty address string is not allowed")]
    Empty,

    /// Address string lacks the `0x` prefix.
    #[error("decoding address failed: missing 0x prefix in {0:?}")]
    MissingPrefix(String),

    /// Address body has the wrong number of hex digits.
    #[error("decoding address failed: expected 40 hex digits, got {got}")]
    InvalidLength { got: usize },

    /// Address body contains non-hex characters.
    #[error("decoding address failed: invalid hex character in {0:?}")]
    InvalidHex(String),

    /// Mixed-case address does not match its EIP-55 checksum.
    #[error("decoding address failed: checksum mismatch for {0:?}")]
    BadChecksum(String),
}

/// Errors validating a coin.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoinError {
    /// Denom does not satisfy the denom grammar.
    #[error("invalid denom: {0:?}")]
    InvalidDenom(String),

    /// Amount is zero or negative.
    #[error("coin amount must be positive, got {0}")]
    NonPositiveAmount(i128),
}

/// Caller is not a member of the authority set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unauthorized: {caller} is not a registered authority")]
pub struct AuthorityError {
    /// Encoded address of the rejected caller.
    pub caller: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_error_messages() {
        let err = AddressError::InvalidLength { got: 12 };
        assert!(err.to_string().contains("decoding address failed"));
        assert!(err.to_string().contains("12"));
    }

    #[test]
    fn test_coin_error_messages() {
        let err = CoinError::NonPositiveAmount(-1);
        assert!(err.to_string().contains("-1"));
    }
}
