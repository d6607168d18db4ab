#![no_main]

use libfuzzer_sys::fuzz_target;

use iou_types::TokenAmount;

// Parsing arbitrary text must never panic; anything that parses must
// render back to a string that parses to the same amount.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(amount) = text.parse::<TokenAmount>() {
        let rendered = amount.to_string();
        assert_eq!(rendered.parse::<TokenAmount>(), Ok(amount));
    }
});
