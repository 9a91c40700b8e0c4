//! # Coins
//!
//! A coin is a denom plus a signed amount. Amounts are signed so that
//! malformed inputs (zero or negative) can be represented and rejected by
//! validation rather than by the type system at decode time.

use crate::errors::CoinError;
use serde::{Deserialize, Serialize};

const DENOM_MIN_LEN: usize = 3;
const DENOM_MAX_LEN: usize = 128;

/// A denominated amount.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    /// Token denomination, e.g. `adv4tnt`.
    pub denom: String,
    /// Amount in base units.
    pub amount: i128,
}

impl Coin {
    /// Create a coin.
    pub fn new(denom: impl Into<String>, amount: i128) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }

    /// Zero-amount coin of the given denom.
    pub fn zero(denom: impl Into<String>) -> Self {
        Self::new(denom, 0)
    }

    /// Validate denom syntax and require a strictly positive amount.
    pub fn validate_positive(&self) -> Result<(), CoinError> {
        validate_denom(&self.denom)?;
        if self.amount <= 0 {
            return Err(CoinError::NonPositiveAmount(self.amount));
        }
        Ok(())
    }

    /// Amount as unsigned base units, if positive.
    pub fn positive_amount(&self) -> Option<u128> {
        if self.amount > 0 {
            Some(self.amount as u128)
        } else {
            None
        }
    }
}

impl std::fmt::Display for Coin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// Check a denom against `[a-zA-Z][a-zA-Z0-9/:._-]{2,127}`.
pub fn validate_denom(denom: &str) -> Result<(), CoinError> {
    let invalid = || CoinError::InvalidDenom(denom.to_string());

    if denom.len() < DENOM_MIN_LEN || denom.len() > DENOM_MAX_LEN {
        return Err(invalid());
    }
    let mut chars = denom.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return Err(invalid()),
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | ':' | '.' | '_' | '-')) {
        return Err(invalid());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_denoms() {
        assert!(validate_denom("adv4tnt").is_ok());
        assert!(validate_denom("ibc/ABCDEF").is_ok());
        assert!(validate_denom("u.usdc-1").is_ok());
    }

    #[test]
    fn test_invalid_denoms() {
        assert!(validate_denom("").is_err());
        assert!(validate_denom("ab").is_err());
        assert!(validate_denom("1abc").is_err());
        assert!(validate_denom("abc def").is_err());
        assert!(validate_denom(&"a".repeat(129)).is_err());
    }

    #[test]
    fn test_validate_positive() {
        assert!(Coin::new("adv4tnt", 1).validate_positive().is_ok());
        assert_eq!(
            Coin::new("adv4tnt", 0).validate_positive(),
            Err(CoinError::NonPositiveAmount(0))
        );
        assert_eq!(
            Coin::new("adv4tnt", -1).validate_positive(),
            Err(CoinError::NonPositiveAmount(-1))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Coin::new("adv4tnt", 888).to_string(), "888adv4tnt");
    }
}
