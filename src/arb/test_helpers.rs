//! Short-label builders shared by the unit tests.

use std::sync::Arc;

use alloy::primitives::U256;

use super::controller::{LoopController, LoopPolicy};
use super::converter::{AssetConverter, FixedRateConverter};
use super::error::LoopError;
use super::ledger::Ledger;
use super::lender::InMemoryPool;
use super::oracle::FixedRateOracle;
use super::rate::Rate;
use super::token::{AccountId, TokenId};

/// Builds a ledger from (account label, token label, balance) rows.
#[allow(dead_code)]
pub fn ledger(balances: &[(&str, &str, u128)]) -> Ledger {
    let mut ledger = Ledger::new();
    for (account, token, balance) in balances {
        ledger.credit(
            AccountId::from(*account),
            TokenId::from(*token),
            U256::from(*balance),
        );
    }
    ledger
}

/// Reads a balance by labels.
#[allow(dead_code)]
pub fn balance(ledger: &Ledger, account: &str, token: &str) -> U256 {
    ledger.balance(AccountId::from(account), TokenId::from(token))
}

/// Builds a rate from an integer out/in ratio.
#[allow(dead_code)]
pub fn rate(amount_out: u64, amount_in: u64) -> Rate {
    Rate::from_ratio(U256::from(amount_out), U256::from(amount_in))
}

/// Builds an oracle from (base, quote, out, in) rate rows.
#[allow(dead_code)]
pub fn oracle(rates: &[(&str, &str, u64, u64)]) -> FixedRateOracle {
    rates.iter().fold(
        FixedRateOracle::new(),
        |oracle, (base, quote, out, input)| {
            oracle.with_rate(
                TokenId::from(*base),
                TokenId::from(*quote),
                rate(*out, *input),
            )
        },
    )
}

/// Builds a converter trading out of `account` from (from, to, out, in)
/// rate rows.
#[allow(dead_code)]
pub fn converter(account: &str, rates: &[(&str, &str, u64, u64)]) -> FixedRateConverter {
    rates.iter().fold(
        FixedRateConverter::new(AccountId::from(account)),
        |converter, (from, to, out, input)| {
            converter.with_rate(TokenId::from(*from), TokenId::from(*to), rate(*out, *input))
        },
    )
}

/// Builds a controller over tokens "A" (base) and "B" (intermediate)
/// where the oracle quotes exactly the converter's rates.
#[allow(dead_code)]
pub fn two_token_controller(
    account: &str,
    pool: &str,
    fee_bps: u64,
    dex: &str,
    rates: &[(&str, &str, u64, u64)],
    policy: LoopPolicy,
) -> LoopController {
    LoopController::new(
        Arc::new(oracle(rates)),
        Arc::new(converter(dex, rates)),
        Arc::new(InMemoryPool::new(AccountId::from(pool), fee_bps)),
        AccountId::from(account),
        TokenId::from("A"),
        TokenId::from("B"),
        policy,
    )
}

/// A converter that fails one configured pair and delegates the rest.
/// Used to exercise the reverse-leg abort path.
#[allow(dead_code)]
pub struct FaultyConverter {
    /// Delegate for pairs that are allowed to fill.
    inner: FixedRateConverter,
    /// The (from, to) pair that always fails.
    fail_from: TokenId,
    /// See `fail_from`.
    fail_to: TokenId,
}

impl FaultyConverter {
    /// Wraps `inner`, failing every conversion of the given pair.
    #[allow(dead_code)]
    pub const fn failing_on(inner: FixedRateConverter, from: TokenId, to: TokenId) -> Self {
        Self {
            inner,
            fail_from: from,
            fail_to: to,
        }
    }
}

impl AssetConverter for FaultyConverter {
    fn convert(
        &self,
        ledger: &mut Ledger,
        trader: AccountId,
        from: TokenId,
        to: TokenId,
        amount_in: U256,
    ) -> Result<U256, LoopError> {
        if from == self.fail_from && to == self.fail_to {
            return Err(LoopError::ConversionFailed {
                from,
                to,
                reason: "liquidity withdrawn".to_string(),
            });
        }
        self.inner.convert(ledger, trader, from, to, amount_in)
    }
}
