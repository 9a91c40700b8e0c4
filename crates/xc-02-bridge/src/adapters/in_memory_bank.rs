//! In-Memory Bank Adapter
//!
//! Implements `BankKeeper` over an ordered balance map.

use crate::domain::BankError;
use crate::ports::BankKeeper;
use shared_types::{encode_address, validate_denom, Address, Coin, CoinError};
use std::collections::BTreeMap;
use tracing::trace;

/// Balances keyed by (account, denom).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InMemoryBank {
    balances: BTreeMap<(Address, String), u128>,
}

impl InMemoryBank {
    /// Empty bank.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of all balances in `denom`.
    pub fn total_supply(&self, denom: &str) -> u128 {
        self.balances
            .iter()
            .filter(|((_, d), _)| d == denom)
            .map(|(_, amount)| *amount)
            .fold(0u128, u128::saturating_add)
    }

    fn balance(&self, address: &Address, denom: &str) -> u128 {
        self.balances
            .get(&(*address, denom.to_string()))
            .copied()
            .unwrap_or(0)
    }

    fn set_balance(&mut self, address: &Address, denom: &str, amount: u128) {
        let key = (*address, denom.to_string());
        if amount == 0 {
            self.balances.remove(&key);
        } else {
            self.balances.insert(key, amount);
        }
    }
}

fn checked_amount(coin: &Coin) -> Result<u128, BankError> {
    validate_denom(&coin.denom)?;
    coin.positive_amount()
        .ok_or(BankError::InvalidCoin(CoinError::NonPositiveAmount(coin.amount)))
}

impl BankKeeper for InMemoryBank {
    fn transfer(&mut self, from: &Address, to: &Address, coin: &Coin) -> Result<(), BankError> {
        let amount = checked_amount(coin)?;
        let from_balance = self.balance(from, &coin.denom);
        if from_balance < amount {
            return Err(BankError::InsufficientFunds {
                address: encode_address(from),
                denom: coin.denom.clone(),
                balance: from_balance,
                required: amount,
            });
        }
        if from == to {
            return Ok(());
        }
        let to_balance = self.balance(to, &coin.denom).saturating_add(amount);
        self.set_balance(from, &coin.denom, from_balance - amount);
        self.set_balance(to, &coin.denom, to_balance);

        trace!(
            "[xc-02] bank transfer {} from {} to {}",
            coin,
            encode_address(from),
            encode_address(to)
        );
        Ok(())
    }

    fn mint_to(&mut self, account: &Address, coin: &Coin) -> Result<(), BankError> {
        let amount = checked_amount(coin)?;
        let balance = self.balance(account, &coin.denom).saturating_add(amount);
        self.set_balance(account, &coin.denom, balance);
        Ok(())
    }

    fn get_balance(&self, address: &Address, denom: &str) -> Coin {
        let amount = self.balance(address, denom);
        Coin::new(denom, i128::try_from(amount).unwrap_or(i128::MAX))
    }
}
