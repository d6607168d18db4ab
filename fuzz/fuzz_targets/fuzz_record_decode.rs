#![no_main]

use libfuzzer_sys::fuzz_target;

use iou_redemption::DepositRecord;

// Stored records come back through bincode; corrupt bytes must be
// rejected, not panic.
fuzz_target!(|data: &[u8]| {
    if let Ok(record) = bincode::deserialize::<DepositRecord>(data) {
        let _ = record.remaining();
        let _ = record.status();
    }
});
