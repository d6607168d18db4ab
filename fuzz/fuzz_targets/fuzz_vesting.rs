#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use iou_redemption::{DepositRecord, VestingSchedule};
use iou_types::{BlockHeight, TokenAmount};

#[derive(Debug, Arbitrary)]
struct Input {
    principal: u128,
    window: u64,
    deposited_at: u64,
    redeems: Vec<u64>,
}

// Walk a deposit through arbitrary redeem times. Vesting must never panic,
// never exceed the principal and never pay out more than was deposited.
fuzz_target!(|input: Input| {
    let Ok(schedule) = VestingSchedule::new(input.window) else {
        return;
    };
    let mut record = DepositRecord::new(
        TokenAmount::new(input.principal),
        BlockHeight::new(input.deposited_at),
    );

    let mut now = input.deposited_at;
    for step in input.redeems.iter().take(64) {
        now = now.saturating_add(*step);
        let at = BlockHeight::new(now);
        let Some(vested) = record.vested_checked(&schedule, at) else {
            continue;
        };
        assert!(vested <= record.amount_deposited);
        assert!(vested >= record.amount_redeemed);
        record.amount_redeemed = vested;
    }
    assert!(record.remaining() <= record.amount_deposited);
});
