//! The loop error taxonomy.
//!
//! Every variant propagates to a full snapshot restore of the ledger: the
//! caller of `start_loop` observes either "balances changed exactly as
//! computed" or "no balance change at all"; never a third outcome.

use alloy::primitives::U256;
use derive_more::Display;

use super::ledger::LedgerError;
use super::token::TokenId;

/// Everything that can abort an arbitrage loop.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum LoopError {
    /// `start_loop` was called with a zero borrow amount.
    #[display("borrow amount must be strictly positive")]
    InvalidBorrowAmount,

    /// The price reference returned a zero or missing rate for a pair.
    /// A zero quote is never treated as a free conversion.
    #[display("invalid price for pair {base}/{quote}")]
    InvalidPrice {
        /// The asset being priced.
        base: TokenId,
        /// The asset the price is quoted in.
        quote: TokenId,
    },

    /// Sizing produced a leg whose expected output truncates to zero.
    /// Proceeding would pay the loan fee for a no-op, a guaranteed loss.
    #[display("leg {from}->{to} sized to zero output")]
    ZeroAmountLeg {
        /// The asset the starved leg would sell.
        from: TokenId,
        /// The asset the starved leg would buy.
        to: TokenId,
    },

    /// The asset converter could not complete a leg, or its realized
    /// output fell below the minimum acceptable output.
    #[display("conversion {from}->{to} failed: {reason}")]
    ConversionFailed {
        /// The asset the leg sold.
        from: TokenId,
        /// The asset the leg bought.
        to: TokenId,
        /// Why the leg was aborted.
        reason: String,
    },

    /// The oracle-implied round trip does not cover principal plus fee.
    /// Only raised when the policy rejects unprofitable loops; checked
    /// before any capital is committed.
    #[display("unprofitable loop: expected {expected_back} back, owes {owed}")]
    UnprofitableLoop {
        /// The oracle-implied base-asset output of the full round trip.
        expected_back: U256,
        /// Principal plus fee owed to the loan source.
        owed: U256,
    },

    /// The post-conversion balance cannot cover principal plus fee.
    #[display("insolvent repayment: owed {owed}, available {available}")]
    InsolventRepayment {
        /// Principal plus fee owed to the loan source.
        owed: U256,
        /// The base-asset balance actually available.
        available: U256,
    },

    /// A second loop was started while one was already in flight.
    #[display("re-entrant loop invocation rejected")]
    ReentrancyRejected,

    /// A ledger mutation failed outside the cases above, e.g. the loan
    /// source itself lacked the liquidity to issue the loan.
    #[display("ledger error: {_0}")]
    Ledger(LedgerError),
}

impl std::error::Error for LoopError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Ledger(err) => Some(err),
            _ => None,
        }
    }
}

impl From<LedgerError> for LoopError {
    fn from(err: LedgerError) -> Self {
        Self::Ledger(err)
    }
}
