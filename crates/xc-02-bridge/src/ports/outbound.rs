//! # Outbound Ports
//!
//! Ledger primitive the bridge moves funds through.

use crate::domain::BankError;
use shared_types::{Address, Coin};

/// Ledger transfer primitive - outbound port.
///
/// Implementations are plain state owned by the application, so cloning one
/// yields an independent branch.
pub trait BankKeeper: Send + Sync {
    /// Move `coin` from `from` to `to`. Atomic: on error neither balance
    /// changes.
    fn transfer(&mut self, from: &Address, to: &Address, coin: &Coin) -> Result<(), BankError>;

    /// Credit `coin` to `account` out of thin air (genesis, tests).
    fn mint_to(&mut self, account: &Address, coin: &Coin) -> Result<(), BankError>;

    /// Balance of `address` in `denom`. Zero if the account is unknown.
    fn get_balance(&self, address: &Address, denom: &str) -> Coin;
}
