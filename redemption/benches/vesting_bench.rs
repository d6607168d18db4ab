use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use iou_assets::MemoryAsset;
use iou_nullables::NullClock;
use iou_redemption::{DepositRecord, LedgerConfig, RedemptionLedger, VestingSchedule};
use iou_types::{AccountId, BlockHeight, TokenAmount};

fn bench_vested_amount(c: &mut Criterion) {
    let mut group = c.benchmark_group("vested_checked");
    let record = DepositRecord::new(TokenAmount::from_units(50), BlockHeight::new(0));

    for window in [5u64, 40_320, 2_102_400] {
        let schedule = VestingSchedule::new(window).unwrap();
        let now = BlockHeight::new(window / 2);

        group.bench_with_input(BenchmarkId::new("mid_window", window), &window, |b, _| {
            b.iter(|| black_box(record.vested_checked(black_box(&schedule), black_box(now))));
        });
    }

    group.finish();
}

fn bench_redeem(c: &mut Criterion) {
    c.bench_function("ledger_deposit_then_redeem", |b| {
        b.iter_batched(
            || {
                let user = AccountId::new("user");
                let custody = AccountId::new("vault");
                let iou = Arc::new(MemoryAsset::new(
                    "IOU",
                    user.clone(),
                    TokenAmount::from_units(50),
                ));
                let out = Arc::new(MemoryAsset::new(
                    "OUT",
                    custody.clone(),
                    TokenAmount::from_units(50),
                ));
                let clock = Arc::new(NullClock::new(0));
                let ledger = RedemptionLedger::new(
                    LedgerConfig::new(custody.clone(), 5),
                    iou.clone(),
                    out,
                    clock.clone(),
                )
                .unwrap();
                iou.approve(&user, &custody, TokenAmount::from_units(50));
                (ledger, clock, user)
            },
            |(ledger, clock, user)| {
                ledger.deposit(&user, TokenAmount::from_units(50)).unwrap();
                clock.advance(2);
                black_box(ledger.redeem(&user).unwrap());
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_vested_amount, bench_redeem);
criterion_main!(benches);
