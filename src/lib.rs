/*!
 * # Flashloop - Atomic Flash-Loan Arbitrage Engine
 *
 * Flashloop executes a single borrow -> convert -> convert -> repay cycle
 * as one indivisible unit of work: it takes an uncollateralized flash loan
 * of a base asset, routes the proceeds through an intermediate asset and
 * back, repays principal plus fee, and keeps any residual as profit. The
 * whole loop either fully commits or fully rolls back: there is no third
 * outcome.
 *
 * ## Core Features
 *
 * - **Atomic Execution**: all balance changes commit together or not at
 *   all, via an explicit ledger snapshot/restore
 * - **Injected Collaborators**: the lending pool, price oracle and asset
 *   converter are trait objects supplied at construction, substitutable
 *   with test doubles
 * - **Solvency Guards**: starved legs, invalid prices and repayment
 *   shortfalls abort the loop before capital is lost
 * - **Policy Knobs**: slippage tolerance and unprofitable-loop rejection
 *   are configuration, not fixed contract
 *
 * ## Module Structure
 *
 * - `arb`: the loop controller, ledger, and collaborator seams
 * - `config`: environment-backed configuration
 * - `utils`: logging setup and other helpers
 */

/// The loop controller, ledger, and collaborator seams
pub mod arb;
/// Environment-backed configuration
pub mod config;
/// Logging setup and other helpers
pub mod utils;
