//! Block heights and the clock the ledger reads them from.
//!
//! Time is measured as a monotonically non-decreasing block counter. The
//! ledger only ever reads it; the host chain (or a test) advances it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// A position on the block counter.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct BlockHeight(u64);

impl BlockHeight {
    /// The first block.
    pub const GENESIS: Self = Self(0);

    pub fn new(height: u64) -> Self {
        Self(height)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Blocks elapsed since this height, relative to `now`.
    ///
    /// Saturates to zero if `now` is earlier than `self`.
    pub fn blocks_since(&self, now: BlockHeight) -> u64 {
        now.0.saturating_sub(self.0)
    }

    pub fn saturating_add(self, blocks: u64) -> Self {
        Self(self.0.saturating_add(blocks))
    }
}

impl fmt::Display for BlockHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Source of the current block height.
pub trait Clock: Send + Sync {
    fn now(&self) -> BlockHeight;
}

/// A block counter owned by the host, advanced as blocks are produced.
///
/// Never moves backwards: [`BlockCounter::set`] ignores heights below the
/// current one.
#[derive(Debug, Default)]
pub struct BlockCounter {
    height: AtomicU64,
}

impl BlockCounter {
    pub fn new(start: BlockHeight) -> Self {
        Self {
            height: AtomicU64::new(start.as_u64()),
        }
    }

    /// Produce `blocks` new blocks and return the new height.
    pub fn advance(&self, blocks: u64) -> BlockHeight {
        let mut current = self.height.load(Ordering::Acquire);
        loop {
            let next = current.saturating_add(blocks);
            match self
                .height
                .compare_exchange(current, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return BlockHeight(next),
                Err(actual) => current = actual,
            }
        }
    }

    /// Move to `height` if it is ahead of the current height.
    pub fn set(&self, height: BlockHeight) -> BlockHeight {
        let prev = self.height.fetch_max(height.as_u64(), Ordering::AcqRel);
        BlockHeight(prev.max(height.as_u64()))
    }
}

impl Clock for BlockCounter {
    fn now(&self) -> BlockHeight {
        BlockHeight(self.height.load(Ordering::Acquire))
    }
}
