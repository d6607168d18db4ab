use proptest::prelude::*;

use iou_types::{BlockCounter, BlockHeight, Clock, TokenAmount};

proptest! {
    /// Display output parses back to the same amount.
    #[test]
    fn amount_display_parses_back(raw in 0u128..u128::MAX / 1_000) {
        let amount = TokenAmount::new(raw);
        let parsed: TokenAmount = amount.to_string().parse().unwrap();
        prop_assert_eq!(parsed, amount);
    }

    /// checked_mul_div never exceeds the exact rational result and is
    /// within one raw unit of it.
    #[test]
    fn amount_mul_div_floors(
        raw in 0u128..1_000_000_000_000_000_000_000,
        num in 0u128..10_000,
        den in 1u128..10_000,
    ) {
        let got = TokenAmount::new(raw).checked_mul_div(num, den).unwrap().raw();
        prop_assert!(got * den <= raw * num);
        prop_assert!(raw * num < (got + 1) * den);
    }

    /// checked_sub returns None exactly when b > a.
    #[test]
    fn amount_checked_sub_underflow(a in 0u128..1_000_000, b in 0u128..1_000_000) {
        let result = TokenAmount::new(a).checked_sub(TokenAmount::new(b));
        if b > a {
            prop_assert!(result.is_none());
        } else {
            prop_assert_eq!(result, Some(TokenAmount::new(a - b)));
        }
    }

    /// blocks_since(now) = now - self, saturating at zero.
    #[test]
    fn height_blocks_since(base in 0u64..1_000_000, now in 0u64..2_000_000) {
        let h = BlockHeight::new(base);
        prop_assert_eq!(h.blocks_since(BlockHeight::new(now)), now.saturating_sub(base));
    }

    /// A block counter only ever moves forward.
    #[test]
    fn counter_is_monotonic(moves in prop::collection::vec((any::<bool>(), 0u64..1_000), 1..50)) {
        let counter = BlockCounter::new(BlockHeight::GENESIS);
        let mut last = counter.now();
        for (absolute, n) in moves {
            if absolute {
                counter.set(BlockHeight::new(n));
            } else {
                counter.advance(n);
            }
            let now = counter.now();
            prop_assert!(now >= last);
            last = now;
        }
    }
}
