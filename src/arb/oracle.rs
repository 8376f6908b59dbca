//! The price reference seam.

use std::collections::HashMap;

use super::error::LoopError;
use super::rate::Rate;
use super::token::TokenId;

/// A read-only source of exchange rates between asset pairs.
///
/// The controller queries it once per direction to size its legs and to
/// validate expected profitability before committing capital. An
/// implementation must return a strictly positive rate or fail explicitly;
/// the controller maps any zero or missing rate to
/// [`LoopError::InvalidPrice`].
pub trait PriceOracle {
    /// Returns the current rate from `base` to `quote`, in quote base
    /// units per one base unit.
    ///
    /// # Errors
    ///
    /// [`LoopError::InvalidPrice`] when no usable rate exists for the pair.
    fn rate(&self, base: TokenId, quote: TokenId) -> Result<Rate, LoopError>;
}

/// A deterministic oracle over a fixed table of pair rates.
///
/// The in-memory stand-in for an on-chain price feed: rates never move
/// between queries, which is what makes sequential loop runs reproducible.
#[derive(Debug, Clone, Default)]
pub struct FixedRateOracle {
    /// Quoted rate per (base, quote) pair.
    rates: HashMap<(TokenId, TokenId), Rate>,
}

impl FixedRateOracle {
    /// Creates an oracle with no quoted pairs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Quotes `rate` for the `base`/`quote` pair, replacing any previous
    /// quote. Builder-style so fixtures read as one expression.
    #[must_use]
    pub fn with_rate(mut self, base: TokenId, quote: TokenId, rate: Rate) -> Self {
        self.rates.insert((base, quote), rate);
        self
    }

    /// Replaces the quote for an existing pair in place.
    pub fn set_rate(&mut self, base: TokenId, quote: TokenId, rate: Rate) {
        self.rates.insert((base, quote), rate);
    }
}

impl PriceOracle for FixedRateOracle {
    fn rate(&self, base: TokenId, quote: TokenId) -> Result<Rate, LoopError> {
        match self.rates.get(&(base, quote)) {
            Some(rate) if !rate.is_zero() => Ok(*rate),
            _ => Err(LoopError::InvalidPrice { base, quote }),
        }
    }
}
