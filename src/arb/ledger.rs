//! In-memory balance book with snapshot/restore.
//!
//! On chain, the hosting environment rolls the whole transaction back when a
//! flash loan is not repaid. This engine has no such host, so the ledger
//! rebuilds that guarantee explicitly: the controller snapshots every mutable
//! balance before the loop and restores the snapshot on any failure, leaving
//! no observable intermediate state.

use std::collections::HashMap;

use alloy::primitives::U256;
use derive_more::Display;

use super::token::{AccountId, TokenId};

/// Errors raised by ledger balance mutations.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A debit was attempted for more than the account holds.
    #[display(
        "insufficient balance: account {account} holds {available} of {token}, needed {needed}"
    )]
    InsufficientBalance {
        /// The account that was debited.
        account: AccountId,
        /// The token being debited.
        token: TokenId,
        /// The amount the debit required.
        needed: U256,
        /// The amount actually held.
        available: U256,
    },
}

impl std::error::Error for LedgerError {}

/// A point-in-time copy of every balance in the ledger.
///
/// Restoring a snapshot erases everything that happened after it was taken,
/// including balances credited to accounts that did not exist at the time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSnapshot {
    /// The copied balance map.
    balances: HashMap<(AccountId, TokenId), U256>,
}

/// Tracks the token balances of every account touched by a loop.
///
/// Accounts are implicit: querying an unknown (account, token) pair reads as
/// zero, and crediting it creates the entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    /// Map of (account, token) to the held balance.
    balances: HashMap<(AccountId, TokenId), U256>,
}

impl Ledger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the balance of `token` held by `account`, zero if never
    /// credited.
    #[must_use]
    pub fn balance(&self, account: AccountId, token: TokenId) -> U256 {
        self.balances
            .get(&(account, token))
            .copied()
            .unwrap_or(U256::ZERO)
    }

    /// Credits `amount` of `token` to `account`.
    pub fn credit(&mut self, account: AccountId, token: TokenId, amount: U256) {
        let entry = self.balances.entry((account, token)).or_insert(U256::ZERO);
        *entry = entry.saturating_add(amount);
    }

    /// Debits `amount` of `token` from `account`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientBalance`] if the account holds
    /// less than `amount`; the ledger is left unchanged in that case.
    pub fn debit(
        &mut self,
        account: AccountId,
        token: TokenId,
        amount: U256,
    ) -> Result<(), LedgerError> {
        let available = self.balance(account, token);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                account,
                token,
                needed: amount,
                available,
            });
        }
        self.balances.insert((account, token), available - amount);
        Ok(())
    }

    /// Moves `amount` of `token` from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientBalance`] if `from` holds less
    /// than `amount`; no balance changes in that case.
    pub fn transfer(
        &mut self,
        from: AccountId,
        to: AccountId,
        token: TokenId,
        amount: U256,
    ) -> Result<(), LedgerError> {
        self.debit(from, token, amount)?;
        self.credit(to, token, amount);
        Ok(())
    }

    /// Takes a snapshot of every balance for later [`Ledger::restore`].
    #[must_use]
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            balances: self.balances.clone(),
        }
    }

    /// Restores the ledger to a previously taken snapshot, discarding every
    /// mutation made since.
    pub fn restore(&mut self, snapshot: LedgerSnapshot) {
        self.balances = snapshot.balances;
    }
}
