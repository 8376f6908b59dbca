//! # Arbitrage Loop Engine
//!
//! The core of the crate: a flash-loan arbitrage loop that borrows a base
//! asset, routes it through a forward and a reverse conversion, repays
//! principal plus fee, and keeps the residual as profit, committing or
//! rolling back as one indivisible unit of work.

/// The loop controller and its policy knobs
pub mod controller;
/// The asset conversion seam and its in-memory implementation
pub mod converter;
/// The loop error taxonomy
pub mod error;
/// The balance ledger with snapshot/restore
pub mod ledger;
/// The flash-loan seam and its in-memory implementation
pub mod lender;
/// The price reference seam and its in-memory implementation
pub mod oracle;
/// WAD fixed-point exchange rates
pub mod rate;
/// Test helpers and builders
mod test_helpers;
/// Asset and account identifiers
pub mod token;
/// Transaction-scoped value types
pub mod types;
