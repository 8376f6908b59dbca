//! The arbitrage loop controller.
//!
//! Orchestrates one borrow -> forward conversion -> reverse conversion ->
//! repay cycle as a single all-or-nothing unit of work. Collaborators are
//! injected at construction as trait objects, so the same controller runs
//! against live-shaped implementations or test doubles without any dynamic
//! lookup.

use std::cell::Cell;
use std::sync::Arc;

use alloy::primitives::U256;
use log::{debug, info, warn};

use super::converter::AssetConverter;
use super::error::LoopError;
use super::ledger::Ledger;
use super::lender::LoanSource;
use super::oracle::PriceOracle;
use super::rate::{bps_of, BPS_DENOMINATOR};
use super::token::{AccountId, TokenId};
use super::types::{ConversionStep, LoanRequest, LoopPhase, ProfitResult, RepaymentObligation};

/// Policy knobs for the two behaviors the reference leaves open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopPolicy {
    /// Maximum tolerated slippage on the forward leg, in basis points of
    /// the oracle-implied output. `None` accepts any nonzero output, the
    /// reference behavior.
    pub max_slippage_bps: Option<u64>,
    /// When set, a loop whose oracle-implied round trip does not exceed
    /// principal plus fee is rejected before any capital is committed.
    /// Off by default: the reference only reverts on repayment shortfall.
    pub reject_unprofitable: bool,
}

/// Orchestrates the flash-loan arbitrage loop over injected collaborators.
///
/// The controller holds no balances itself; its funds live in the ledger
/// under [`LoopController::account`]. It keeps no state across invocations
/// beyond the transient re-entrancy guard.
pub struct LoopController {
    /// Valuation reference for sizing and profitability checks.
    oracle: Arc<dyn PriceOracle>,
    /// Executes the two conversion legs.
    converter: Arc<dyn AssetConverter>,
    /// Issues and reclaims the flash loan.
    lender: Arc<dyn LoanSource>,
    /// The ledger account holding this controller's funds.
    account: AccountId,
    /// The borrowed (and repaid) asset.
    base: TokenId,
    /// The asset routed through between the two legs.
    intermediate: TokenId,
    /// Slippage and profitability policy.
    policy: LoopPolicy,
    /// Set while a loop is in flight; a second entry is rejected.
    in_flight: Cell<bool>,
}

impl LoopController {
    /// Creates a controller over the given collaborators.
    #[must_use]
    pub fn new(
        oracle: Arc<dyn PriceOracle>,
        converter: Arc<dyn AssetConverter>,
        lender: Arc<dyn LoanSource>,
        account: AccountId,
        base: TokenId,
        intermediate: TokenId,
        policy: LoopPolicy,
    ) -> Self {
        Self {
            oracle,
            converter,
            lender,
            account,
            base,
            intermediate,
            policy,
            in_flight: Cell::new(false),
        }
    }

    /// The ledger account holding this controller's funds.
    #[must_use]
    pub const fn account(&self) -> AccountId {
        self.account
    }

    /// Runs one full arbitrage loop with a flash loan of `borrow_amount`
    /// of the base asset.
    ///
    /// On success the residual base-asset balance above the starting
    /// balance is the profit, left in the controller's custody. On any
    /// failure the pre-call ledger snapshot is restored, so the caller
    /// observes either the exact computed balance change or none at all.
    ///
    /// # Errors
    ///
    /// Any [`LoopError`]; see the taxonomy in [`super::error`]. Every
    /// error implies zero balance change.
    pub fn start_loop(
        &self,
        ledger: &mut Ledger,
        borrow_amount: U256,
    ) -> Result<ProfitResult, LoopError> {
        if borrow_amount.is_zero() {
            return Err(LoopError::InvalidBorrowAmount);
        }
        // The guard stays set if this frame is the re-entrant one: only
        // the outer frame may clear it.
        if self.in_flight.replace(true) {
            return Err(LoopError::ReentrancyRejected);
        }

        let snapshot = ledger.snapshot();
        let result = self.run_loop(ledger, borrow_amount);
        self.in_flight.set(false);

        match result {
            Ok(profit) => {
                info!(
                    "loop committed: start {start}, end {end}, profit {profit}",
                    start = profit.starting_balance,
                    end = profit.final_balance,
                    profit = profit.profit()
                );
                Ok(profit)
            }
            Err(err) => {
                warn!("loop aborted, restoring snapshot: {err}");
                ledger.restore(snapshot);
                Err(err)
            }
        }
    }

    /// The loop body. Any error returned here is mapped to a snapshot
    /// restore by [`LoopController::start_loop`].
    fn run_loop(&self, ledger: &mut Ledger, borrow_amount: U256) -> Result<ProfitResult, LoopError> {
        let starting_balance = ledger.balance(self.account, self.base);
        let request = LoanRequest {
            asset: self.base,
            amount: borrow_amount,
        };
        debug!(
            "{phase}: requesting {amount} of {base:?}",
            phase = LoopPhase::LoanRequested,
            amount = request.amount,
            base = request.asset
        );

        self.lender.flash_loan(
            ledger,
            self.account,
            request.asset,
            request.amount,
            &mut |ledger, obligation| self.on_loan(ledger, obligation),
        )?;

        debug!("{phase}: settlement complete", phase = LoopPhase::Repaid);
        Ok(ProfitResult {
            starting_balance,
            final_balance: ledger.balance(self.account, self.base),
        })
    }

    /// The loan callback: the continuation of the same logical operation,
    /// invoked synchronously by the loan source while the borrowed funds
    /// are in hand.
    fn on_loan(
        &self,
        ledger: &mut Ledger,
        obligation: &RepaymentObligation,
    ) -> Result<(), LoopError> {
        // Both rates up front. A zero or missing rate aborts before any
        // conversion; zero is never a free conversion.
        let forward_rate = self.oracle.rate(self.base, self.intermediate)?;
        let reverse_rate = self.oracle.rate(self.intermediate, self.base)?;

        // Size the forward leg with the received loan amount, using the
        // same truncation rule the converter uses. A leg that sizes to
        // zero would still pay the loan fee for a no-op: guaranteed loss.
        let expected_mid = forward_rate.apply(obligation.principal);
        if expected_mid.is_zero() {
            return Err(LoopError::ZeroAmountLeg {
                from: self.base,
                to: self.intermediate,
            });
        }

        let owed = obligation.total_owed();
        if self.policy.reject_unprofitable {
            let expected_back = reverse_rate.apply(expected_mid);
            if expected_back <= owed {
                return Err(LoopError::UnprofitableLoop {
                    expected_back,
                    owed,
                });
            }
        }

        let forward = ConversionStep {
            from_asset: self.base,
            to_asset: self.intermediate,
            input_amount: obligation.principal,
            min_acceptable_output: self.min_acceptable(expected_mid),
        };
        let realized_mid = self.converter.convert(
            ledger,
            self.account,
            forward.from_asset,
            forward.to_asset,
            forward.input_amount,
        )?;
        if realized_mid < forward.min_acceptable_output {
            return Err(LoopError::ConversionFailed {
                from: forward.from_asset,
                to: forward.to_asset,
                reason: format!(
                    "realized output {realized_mid} below minimum {min}",
                    min = forward.min_acceptable_output
                ),
            });
        }
        debug!(
            "{phase}: {amount_in} -> {realized_mid}",
            phase = LoopPhase::ForwardConverted,
            amount_in = forward.input_amount
        );

        // The reverse leg consumes the full realized output of the
        // forward leg.
        let reverse = ConversionStep {
            from_asset: self.intermediate,
            to_asset: self.base,
            input_amount: realized_mid,
            min_acceptable_output: U256::from(1),
        };
        let realized_back = self.converter.convert(
            ledger,
            self.account,
            reverse.from_asset,
            reverse.to_asset,
            reverse.input_amount,
        )?;
        if realized_back.is_zero() {
            return Err(LoopError::InsolventRepayment {
                owed,
                available: ledger.balance(self.account, self.base),
            });
        }
        debug!(
            "{phase}: {amount_in} -> {realized_back}",
            phase = LoopPhase::ReverseConverted,
            amount_in = reverse.input_amount
        );

        // Fail inside the callback when repayment cannot be covered; the
        // loan source re-verifies, but this is where the shortfall is
        // first known.
        let available = ledger.balance(self.account, self.base);
        if available < owed {
            return Err(LoopError::InsolventRepayment { owed, available });
        }
        Ok(())
    }

    /// The minimum realized output accepted for a leg with the given
    /// oracle-implied output: one base unit under the permissive policy,
    /// or the slippage-bounded floor, whichever is larger.
    fn min_acceptable(&self, expected: U256) -> U256 {
        let floor = match self.policy.max_slippage_bps {
            Some(bps) => bps_of(expected, BPS_DENOMINATOR.saturating_sub(bps)),
            None => U256::ZERO,
        };
        floor.max(U256::from(1))
    }
}
