//! The asset conversion seam.

use std::collections::HashMap;

use alloy::primitives::U256;
use log::debug;

use super::error::LoopError;
use super::ledger::Ledger;
use super::rate::Rate;
use super::token::{AccountId, TokenId};

/// Executes an actual conversion of one asset into another against the
/// ledger.
///
/// A converter may realize less than the price-implied output (slippage)
/// and may fail outright on insufficient liquidity or an unsupported pair.
/// The controller treats any failure as aborting the whole loop.
pub trait AssetConverter {
    /// Converts `amount_in` of `from` held by `trader` into `to`,
    /// returning the realized output amount.
    ///
    /// On success the ledger reflects the full exchange: `trader` has paid
    /// `amount_in` of `from` and received the returned amount of `to`.
    ///
    /// # Errors
    ///
    /// [`LoopError::ConversionFailed`] when the leg cannot complete; the
    /// ledger must be left unchanged in that case.
    fn convert(
        &self,
        ledger: &mut Ledger,
        trader: AccountId,
        from: TokenId,
        to: TokenId,
        amount_in: U256,
    ) -> Result<U256, LoopError>;
}

/// A deterministic converter that fills at a fixed per-pair rate out of its
/// own ledger-backed inventory.
///
/// Liquidity is finite: a fill larger than the inventory of the output
/// asset fails rather than partially filling. Slippage against the oracle
/// is modeled by quoting this converter a different rate than the oracle.
#[derive(Debug, Clone)]
pub struct FixedRateConverter {
    /// The account holding this converter's inventory.
    account: AccountId,
    /// Fill rate per (from, to) pair.
    rates: HashMap<(TokenId, TokenId), Rate>,
}

impl FixedRateConverter {
    /// Creates a converter whose inventory lives under `account`.
    #[must_use]
    pub fn new(account: AccountId) -> Self {
        Self {
            account,
            rates: HashMap::new(),
        }
    }

    /// Quotes `rate` for filling `from` into `to`. Builder-style.
    #[must_use]
    pub fn with_rate(mut self, from: TokenId, to: TokenId, rate: Rate) -> Self {
        self.rates.insert((from, to), rate);
        self
    }

    /// The account holding this converter's inventory.
    #[must_use]
    pub const fn account(&self) -> AccountId {
        self.account
    }

    /// Maps a leg failure into the loop error taxonomy.
    fn failed(from: TokenId, to: TokenId, reason: impl Into<String>) -> LoopError {
        LoopError::ConversionFailed {
            from,
            to,
            reason: reason.into(),
        }
    }
}

impl AssetConverter for FixedRateConverter {
    fn convert(
        &self,
        ledger: &mut Ledger,
        trader: AccountId,
        from: TokenId,
        to: TokenId,
        amount_in: U256,
    ) -> Result<U256, LoopError> {
        if amount_in.is_zero() {
            return Err(Self::failed(from, to, "zero input amount"));
        }

        let rate = self
            .rates
            .get(&(from, to))
            .ok_or_else(|| Self::failed(from, to, "unsupported pair"))?;
        let amount_out = rate.apply(amount_in);

        // Validate both sides before mutating anything, so a failed leg
        // leaves the ledger untouched on its own.
        if ledger.balance(trader, from) < amount_in {
            return Err(Self::failed(from, to, "trader balance below input"));
        }
        if ledger.balance(self.account, to) < amount_out {
            return Err(Self::failed(from, to, "insufficient liquidity"));
        }

        ledger.transfer(trader, self.account, from, amount_in)?;
        ledger.transfer(self.account, trader, to, amount_out)?;

        debug!("converted {amount_in} {from:?} -> {amount_out} {to:?}");
        Ok(amount_out)
    }
}
