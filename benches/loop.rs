use std::sync::Arc;

use alloy::primitives::{Address, U256};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use flashloop::arb::{
    controller::{LoopController, LoopPolicy},
    converter::FixedRateConverter,
    ledger::Ledger,
    lender::InMemoryPool,
    oracle::FixedRateOracle,
    rate::Rate,
    token::{AccountId, TokenId},
};

/// Generate a new random address-backed token id
fn generate_random_token() -> TokenId {
    TokenId::from(Address::left_padding_from(&fastrand::u64(..).to_be_bytes()))
}

/// Build a controller plus seeded ledger over one random token pair.
///
/// The swapper quotes a slim round-trip edge over the oracle so the loop
/// commits, which is the path worth measuring.
fn build_scenario(liquidity: u64) -> (Ledger, LoopController) {
    let base = generate_random_token();
    let intermediate = generate_random_token();

    let controller_account = AccountId::from("bench-controller");
    let pool_account = AccountId::from("bench-pool");
    let swapper_account = AccountId::from("bench-swapper");

    let mut ledger = Ledger::new();
    ledger.credit(controller_account, base, U256::from(liquidity / 100));
    ledger.credit(pool_account, base, U256::from(liquidity));
    ledger.credit(swapper_account, base, U256::from(liquidity) * U256::from(10));
    ledger.credit(
        swapper_account,
        intermediate,
        U256::from(liquidity) * U256::from(10),
    );

    let forward = Rate::from_ratio(U256::from(2), U256::from(1));
    let reverse = Rate::from_ratio(U256::from(1), U256::from(2));
    // 10 bps better than the oracle-implied round trip.
    let reverse_swap = Rate::from_ratio(U256::from(5_005), U256::from(10_000));

    let oracle = FixedRateOracle::new()
        .with_rate(base, intermediate, forward)
        .with_rate(intermediate, base, reverse);
    let converter = FixedRateConverter::new(swapper_account)
        .with_rate(base, intermediate, forward)
        .with_rate(intermediate, base, reverse_swap);
    let pool = InMemoryPool::new(pool_account, 9);

    let controller = LoopController::new(
        Arc::new(oracle),
        Arc::new(converter),
        Arc::new(pool),
        controller_account,
        base,
        intermediate,
        LoopPolicy::default(),
    );

    (ledger, controller)
}

/// Measure one committed loop end to end: snapshot, loan, both legs,
/// repayment, settlement.
fn bench_loop_commit(c: &mut Criterion) {
    let mut group = c.benchmark_group("loop_commit");

    for liquidity in &[1_000_000u64, 100_000_000, 10_000_000_000] {
        let (ledger, controller) = build_scenario(*liquidity);
        let amount = U256::from(liquidity / 10);

        group.bench_with_input(
            BenchmarkId::from_parameter(liquidity),
            liquidity,
            |b, _| {
                b.iter(|| {
                    let mut ledger = ledger.clone();
                    black_box(controller.start_loop(&mut ledger, black_box(amount)))
                });
            },
        );
    }

    group.finish();
}

/// Measure the abort path: an unprofitable loop that fails repayment and
/// restores the snapshot.
fn bench_loop_rollback(c: &mut Criterion) {
    let base = generate_random_token();
    let intermediate = generate_random_token();

    let controller_account = AccountId::from("bench-controller");
    let pool_account = AccountId::from("bench-pool");
    let swapper_account = AccountId::from("bench-swapper");

    let mut ledger = Ledger::new();
    ledger.credit(pool_account, base, U256::from(1_000_000u64));
    ledger.credit(swapper_account, base, U256::from(10_000_000u64));
    ledger.credit(swapper_account, intermediate, U256::from(10_000_000u64));

    // Ideal round trip: the 9 bps fee makes repayment fall short every
    // time, since the controller holds no buffer.
    let forward = Rate::from_ratio(U256::from(2), U256::from(1));
    let reverse = Rate::from_ratio(U256::from(1), U256::from(2));

    let oracle = FixedRateOracle::new()
        .with_rate(base, intermediate, forward)
        .with_rate(intermediate, base, reverse);
    let converter = FixedRateConverter::new(swapper_account)
        .with_rate(base, intermediate, forward)
        .with_rate(intermediate, base, reverse);

    let controller = LoopController::new(
        Arc::new(oracle),
        Arc::new(converter),
        Arc::new(InMemoryPool::new(pool_account, 9)),
        controller_account,
        base,
        intermediate,
        LoopPolicy::default(),
    );

    c.bench_function("loop_rollback", |b| {
        b.iter(|| {
            let mut ledger = ledger.clone();
            black_box(controller.start_loop(&mut ledger, black_box(U256::from(100_000u64))))
        });
    });
}

criterion_group!(benches, bench_loop_commit, bench_loop_rollback);
criterion_main!(benches);
