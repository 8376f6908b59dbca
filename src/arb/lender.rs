//! The flash-loan seam.

use alloy::primitives::U256;
use log::debug;

use super::error::LoopError;
use super::ledger::Ledger;
use super::rate::bps_of;
use super::token::{AccountId, TokenId};
use super::types::RepaymentObligation;

/// The borrower's continuation, invoked synchronously by the loan source
/// while the borrowed funds sit in the recipient's account.
///
/// Returning `Ok(())` means the funds for repayment have been arranged;
/// any error propagates out of [`LoanSource::flash_loan`] unchanged.
pub type LoanCallback<'a> =
    &'a mut dyn FnMut(&mut Ledger, &RepaymentObligation) -> Result<(), LoopError>;

/// Issues uncollateralized loans that must be repaid, with fee, before the
/// issuing call returns.
///
/// The callback is not a registered handler: it is the continuation of the
/// borrower's own call stack, invoked mid-call, which keeps the whole loop
/// a single synchronous unit of work.
pub trait LoanSource {
    /// The fee this source charges on a loan of `amount` of `asset`.
    fn flash_fee(&self, asset: TokenId, amount: U256) -> U256;

    /// Transfers `amount` of `asset` to `recipient`, invokes `callback`
    /// with the repayment obligation, then reclaims principal plus fee.
    ///
    /// # Errors
    ///
    /// Propagates any error from `callback`; returns
    /// [`LoopError::InsolventRepayment`] when the recipient's balance
    /// cannot cover the obligation after the callback returns, and a
    /// ledger error when the source itself lacks the liquidity to issue
    /// the loan. On any error the caller owns the rollback: this method
    /// makes no attempt to undo the issuance itself.
    fn flash_loan(
        &self,
        ledger: &mut Ledger,
        recipient: AccountId,
        asset: TokenId,
        amount: U256,
        callback: LoanCallback<'_>,
    ) -> Result<(), LoopError>;
}

/// A deterministic loan source lending out of its own ledger-backed
/// liquidity at a flat basis-point fee.
#[derive(Debug, Clone)]
pub struct InMemoryPool {
    /// The account holding this pool's liquidity.
    account: AccountId,
    /// Flat fee in basis points of the principal.
    fee_bps: u64,
}

impl InMemoryPool {
    /// Creates a pool lending out of `account` at `fee_bps`.
    #[must_use]
    pub const fn new(account: AccountId, fee_bps: u64) -> Self {
        Self { account, fee_bps }
    }

    /// The account holding this pool's liquidity.
    #[must_use]
    pub const fn account(&self) -> AccountId {
        self.account
    }
}

impl LoanSource for InMemoryPool {
    fn flash_fee(&self, _asset: TokenId, amount: U256) -> U256 {
        bps_of(amount, self.fee_bps)
    }

    fn flash_loan(
        &self,
        ledger: &mut Ledger,
        recipient: AccountId,
        asset: TokenId,
        amount: U256,
        callback: LoanCallback<'_>,
    ) -> Result<(), LoopError> {
        let obligation = RepaymentObligation {
            asset,
            principal: amount,
            fee: self.flash_fee(asset, amount),
        };

        // Issue the principal. A pool without the liquidity fails here and
        // nothing has been lent.
        ledger.transfer(self.account, recipient, asset, amount)?;
        debug!(
            "flash loan issued: {amount} {asset:?}, fee {fee}",
            fee = obligation.fee
        );

        callback(ledger, &obligation)?;

        // Reclaim principal + fee. The verification mirrors what the
        // on-chain pool enforces: insufficient funds mean the whole unit
        // of work, the issuance included, must be undone by the caller.
        let owed = obligation.total_owed();
        let available = ledger.balance(recipient, asset);
        if available < owed {
            return Err(LoopError::InsolventRepayment { owed, available });
        }
        ledger.transfer(recipient, self.account, asset, owed)?;
        debug!("flash loan repaid: {owed} {asset:?}");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::arb::test_helpers::*;

    #[test]
    fn test_fee_schedule() {
        let pool = InMemoryPool::new("pool".into(), 9);
        assert_eq!(
            pool.flash_fee("USDC".into(), U256::from(100_000)),
            U256::from(90)
        );
        let free = InMemoryPool::new("pool".into(), 0);
        assert_eq!(free.flash_fee("USDC".into(), U256::from(100_000)), U256::ZERO);
    }

    #[test]
    fn test_loan_issued_then_reclaimed() {
        let mut ledger = ledger(&[("pool", "USDC", 100_000), ("borrower", "USDC", 100)]);
        let pool = InMemoryPool::new("pool".into(), 9);

        let mut seen_mid_loan = U256::ZERO;
        pool.flash_loan(
            &mut ledger,
            "borrower".into(),
            "USDC".into(),
            U256::from(10_000),
            &mut |ledger, obligation| {
                // Funds are in hand while the callback runs.
                seen_mid_loan = ledger.balance("borrower".into(), "USDC".into());
                assert_eq!(obligation.total_owed(), U256::from(10_009));
                Ok(())
            },
        )
        .unwrap();

        assert_eq!(seen_mid_loan, U256::from(10_100));
        // Borrower paid the fee out of its buffer.
        assert_eq!(balance(&ledger, "borrower", "USDC"), U256::from(91));
        assert_eq!(balance(&ledger, "pool", "USDC"), U256::from(100_009));
    }

    #[test]
    fn test_shortfall_is_insolvent_repayment() {
        let mut ledger = ledger(&[("pool", "USDC", 100_000)]);
        let pool = InMemoryPool::new("pool".into(), 9);

        // Borrower has no buffer, so the fee cannot be covered.
        let err = pool
            .flash_loan(
                &mut ledger,
                "borrower".into(),
                "USDC".into(),
                U256::from(10_000),
                &mut |_, _| Ok(()),
            )
            .unwrap_err();

        assert_eq!(
            err,
            LoopError::InsolventRepayment {
                owed: U256::from(10_009),
                available: U256::from(10_000),
            }
        );
    }

    #[test]
    fn test_callback_error_propagates() {
        let mut ledger = ledger(&[("pool", "USDC", 100_000)]);
        let pool = InMemoryPool::new("pool".into(), 9);

        let err = pool
            .flash_loan(
                &mut ledger,
                "borrower".into(),
                "USDC".into(),
                U256::from(10_000),
                &mut |_, _| Err(LoopError::InvalidBorrowAmount),
            )
            .unwrap_err();

        assert_eq!(err, LoopError::InvalidBorrowAmount);
    }

    #[test]
    fn test_pool_without_liquidity_cannot_issue() {
        let mut ledger = ledger(&[("pool", "USDC", 50)]);
        let pool = InMemoryPool::new("pool".into(), 9);

        let err = pool
            .flash_loan(
                &mut ledger,
                "borrower".into(),
                "USDC".into(),
                U256::from(10_000),
                &mut |_, _| Ok(()),
            )
            .unwrap_err();

        assert!(matches!(err, LoopError::Ledger(_)));
    }
}
