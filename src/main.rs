//! Demo binary: wires the loop controller to deterministic in-memory
//! collaborators and runs one arbitrage loop, mirroring the reference
//! USDC/WETH scenario.

use std::sync::Arc;

use alloy::primitives::{address, U256};
use clap::{Parser, Subcommand};
use eyre::Result;
use log::info;
use serde::Serialize;

use flashloop::arb::controller::LoopController;
use flashloop::arb::converter::FixedRateConverter;
use flashloop::arb::ledger::Ledger;
use flashloop::arb::lender::InMemoryPool;
use flashloop::arb::oracle::FixedRateOracle;
use flashloop::arb::rate::{Rate, WAD};
use flashloop::arb::token::{AccountId, TokenId};
use flashloop::config::Config;
use flashloop::utils::logger::setup_logger;

/// One USDC in 6-decimal base units.
const USDC_UNIT: u64 = 1_000_000;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute; defaults to a single demo loop.
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one arbitrage loop against the in-memory scenario
    Run {
        /// Loan principal in whole USDC
        #[arg(long, default_value_t = 100_000)]
        amount: u64,
        /// Print the profit report as JSON instead of log lines
        #[arg(long)]
        json: bool,
    },
}

/// The profit report printed by `--json`.
#[derive(Serialize)]
struct ProfitReport {
    /// Base-asset balance before the loop, in base units.
    starting_balance: String,
    /// Base-asset balance after the loop, in base units.
    final_balance: String,
    /// Signed profit in base units.
    profit: String,
}

fn main() -> Result<()> {
    setup_logger()?;
    let config = Config::from_env();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Run { amount, json }) => run_demo_loop(&config, amount, json),
        None => run_demo_loop(&config, 100_000, false),
    }
}

/// Builds the reference scenario and runs one loop of `amount` whole USDC.
fn run_demo_loop(config: &Config, amount: u64, json: bool) -> Result<()> {
    // Polygon mainnet addresses, used purely as identifiers here.
    let usdc = TokenId::from(address!("0x2791Bca1f2de4661ED88A30C99A7a9449Aa84174"));
    let weth = TokenId::from(address!("0x7ceB23fD6bC0adD59E62ac25578270cFf1b9f619"));

    let controller_account = AccountId::from("flashloop");
    let pool_account = AccountId::from("pool");
    let swapper_account = AccountId::from("swapper");

    // Seed balances the way the reference integration test does: a small
    // buffer for the controller, 100k USDC of pool liquidity, deep
    // two-sided swapper inventory.
    let mut ledger = Ledger::new();
    ledger.credit(controller_account, usdc, U256::from(10 * USDC_UNIT));
    ledger.credit(pool_account, usdc, U256::from(100_000 * USDC_UNIT));
    ledger.credit(swapper_account, usdc, U256::from(500_000 * USDC_UNIT));
    ledger.credit(
        swapper_account,
        weth,
        U256::from(500_000u128 * 1_000_000_000_000_000_000),
    );

    // Oracle at 2000 USDC/WETH in both directions; the swapper pays a
    // small premium on the way back, which is the arbitrage edge.
    let forward = Rate::from_ratio(
        U256::from(500_000_000_000_000u64), // 0.0005 WETH in wei
        U256::from(USDC_UNIT),
    );
    let reverse_oracle = Rate::from_ratio(U256::from(2_000 * USDC_UNIT), WAD);
    let reverse_swap = Rate::from_ratio(U256::from(2_002 * USDC_UNIT), WAD);

    let oracle = FixedRateOracle::new()
        .with_rate(usdc, weth, forward)
        .with_rate(weth, usdc, reverse_oracle);
    let converter = FixedRateConverter::new(swapper_account)
        .with_rate(usdc, weth, forward)
        .with_rate(weth, usdc, reverse_swap);
    let pool = InMemoryPool::new(pool_account, config.fee_bps);

    let controller = LoopController::new(
        Arc::new(oracle),
        Arc::new(converter),
        Arc::new(pool),
        controller_account,
        usdc,
        weth,
        config.policy,
    );

    info!("starting loop: {amount} USDC principal, fee {fee} bps", fee = config.fee_bps);
    let result = controller.start_loop(&mut ledger, U256::from(amount) * U256::from(USDC_UNIT))?;

    if json {
        let report = ProfitReport {
            starting_balance: result.starting_balance.to_string(),
            final_balance: result.final_balance.to_string(),
            profit: result.profit().to_string(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        info!(
            "loop done: start {start}, end {end}, profit {profit} (base units)",
            start = result.starting_balance,
            end = result.final_balance,
            profit = result.profit()
        );
    }
    Ok(())
}
