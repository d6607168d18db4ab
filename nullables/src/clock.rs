//! Nullable clock — deterministic block height for testing.

use iou_types::{BlockHeight, Clock};
use std::sync::atomic::{AtomicU64, Ordering};

/// A deterministic clock for testing.
///
/// Height only changes when you tell it to. Unlike a real block counter,
/// [`NullClock::set`] may move backwards.
pub struct NullClock {
    current: AtomicU64,
}

impl NullClock {
    pub fn new(initial_height: u64) -> Self {
        Self {
            current: AtomicU64::new(initial_height),
        }
    }

    /// Advance by a number of blocks.
    pub fn advance(&self, blocks: u64) {
        self.current.fetch_add(blocks, Ordering::SeqCst);
    }

    /// Set the height to a specific value.
    pub fn set(&self, height: u64) {
        self.current.store(height, Ordering::SeqCst);
    }
}

impl Clock for NullClock {
    fn now(&self) -> BlockHeight {
        BlockHeight::new(self.current.load(Ordering::SeqCst))
    }
}
