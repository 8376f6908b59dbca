use std::fmt::{self, Debug};

use alloy::primitives::Address;
use derive_more::Display;

/// A unique identifier for an asset, backed by its on-chain address.
///
/// The engine never inspects the address itself; it is only used as a key
/// into the [`Ledger`](super::ledger::Ledger) and collaborator rate tables.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[display("{_0}")]
pub struct TokenId(Address);

impl TokenId {
    /// Returns the underlying address of this token.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.0
    }
}

impl From<Address> for TokenId {
    fn from(address: Address) -> Self {
        Self(address)
    }
}

/// Builds a token id from a short label by left-padding the label bytes
/// into an address. Deterministic, so equal labels compare equal.
/// Intended for tests and synthetic fixtures, not for live addresses.
impl From<&str> for TokenId {
    fn from(label: &str) -> Self {
        Self(Address::left_padding_from(label.as_bytes()))
    }
}

impl Debug for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token({})", self.0)
    }
}

/// A unique identifier for a balance-holding account in the ledger.
///
/// The controller, the converter's inventory, and the lending pool's
/// liquidity each live under their own account.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[display("{_0}")]
pub struct AccountId(Address);

impl AccountId {
    /// Returns the underlying address of this account.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.0
    }
}

impl From<Address> for AccountId {
    fn from(address: Address) -> Self {
        Self(address)
    }
}

/// Builds an account id from a short label, same scheme as [`TokenId`].
impl From<&str> for AccountId {
    fn from(label: &str) -> Self {
        Self(Address::left_padding_from(label.as_bytes()))
    }
}

impl Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Account({})", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_label_ids_are_deterministic() {
        assert_eq!(TokenId::from("USDC"), TokenId::from("USDC"));
        assert_ne!(TokenId::from("USDC"), TokenId::from("WETH"));
        assert_eq!(AccountId::from("pool"), AccountId::from("pool"));
        assert_ne!(AccountId::from("pool"), AccountId::from("swapper"));
    }

    #[test]
    fn test_token_and_account_share_padding_scheme() {
        // Same label, different types: never comparable, but same address.
        assert_eq!(
            TokenId::from("A").address(),
            AccountId::from("A").address()
        );
    }
}
