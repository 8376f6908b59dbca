//! Transaction-scoped value types of the arbitrage loop.
//!
//! Every type here lives only for the duration of one `start_loop` frame;
//! there is no cross-invocation state anywhere in the engine.

use alloy::primitives::{I256, U256};
use derive_more::Display;

use super::token::TokenId;

/// A request for an uncollateralized loan of the base asset.
///
/// Created at `start_loop` invocation and owned exclusively by that frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoanRequest {
    /// The asset being borrowed.
    pub asset: TokenId,
    /// The requested principal; always strictly positive.
    pub amount: U256,
}

/// One directional leg of the arbitrage loop.
///
/// Two instances exist per loop: the forward leg (base to intermediate) and
/// the reverse leg (intermediate back to base). The legs chain: the forward
/// leg's `to_asset` is the reverse leg's `from_asset`, and the forward
/// leg's realized output becomes the reverse leg's `input_amount`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionStep {
    /// The asset being sold.
    pub from_asset: TokenId,
    /// The asset being bought.
    pub to_asset: TokenId,
    /// The amount of `from_asset` to sell; always strictly positive.
    pub input_amount: U256,
    /// The smallest realized output the controller will accept for this
    /// leg. At least one base unit, tightened by the slippage policy.
    pub min_acceptable_output: U256,
}

/// What the borrower owes the loan source before the callback returns.
///
/// Derived from the [`LoanRequest`] and the loan source's fee schedule at
/// callback time; `total_owed() >= principal` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepaymentObligation {
    /// The borrowed asset, which is also the repayment asset.
    pub asset: TokenId,
    /// The borrowed principal.
    pub principal: U256,
    /// The loan fee on top of the principal.
    pub fee: U256,
}

impl RepaymentObligation {
    /// The full amount that must be available for reclamation:
    /// principal plus fee.
    #[must_use]
    pub fn total_owed(&self) -> U256 {
        self.principal.saturating_add(self.fee)
    }
}

/// The balance outcome of one successful loop run.
///
/// A successful run does not imply a positive profit: with the permissive
/// policy a loop that repays the loan but eats the fee still commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfitResult {
    /// The controller's base-asset balance before the loan was requested.
    pub starting_balance: U256,
    /// The controller's base-asset balance after repayment settled.
    pub final_balance: U256,
}

impl ProfitResult {
    /// The realized profit: final balance minus starting balance.
    /// Negative when the loop was solvent but unprofitable.
    #[must_use]
    pub fn profit(&self) -> I256 {
        I256::from_raw(self.final_balance).saturating_sub(I256::from_raw(self.starting_balance))
    }

    /// Whether the loop ended with strictly more base asset than it began
    /// with.
    #[must_use]
    pub fn is_profitable(&self) -> bool {
        self.final_balance > self.starting_balance
    }
}

/// The phases of one loop run, in execution order.
///
/// Used for trace logging only. No phase ever persists: a failure in any
/// phase restores the pre-loop snapshot, which collapses every failure edge
/// of the `Idle -> LoanRequested -> ForwardConverted -> ReverseConverted ->
/// Repaid -> Idle` machine straight back to `Idle`.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    /// No loop in flight.
    Idle,
    /// The flash loan has been requested and funds received.
    LoanRequested,
    /// The forward leg (base to intermediate) has been realized.
    ForwardConverted,
    /// The reverse leg (intermediate to base) has been realized.
    ReverseConverted,
    /// Principal plus fee have been reclaimed by the loan source.
    Repaid,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_total_owed_includes_fee() {
        let obligation = RepaymentObligation {
            asset: TokenId::from("USDC"),
            principal: U256::from(100_000),
            fee: U256::from(90),
        };
        assert_eq!(obligation.total_owed(), U256::from(100_090));
        assert!(obligation.total_owed() >= obligation.principal);
    }

    #[test]
    fn test_profit_can_be_negative() {
        let result = ProfitResult {
            starting_balance: U256::from(1_000),
            final_balance: U256::from(910),
        };
        assert_eq!(result.profit(), I256::try_from(-90i64).unwrap());
        assert!(!result.is_profitable());

        let result = ProfitResult {
            starting_balance: U256::from(1_000),
            final_balance: U256::from(1_010),
        };
        assert_eq!(result.profit(), I256::try_from(10i64).unwrap());
        assert!(result.is_profitable());
    }
}
