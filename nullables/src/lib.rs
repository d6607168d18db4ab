//! Nullable infrastructure for deterministic testing.
//!
//! Inspired by the "A-frame architecture" pattern from RsNano.
//! All external dependencies (clock, assets, storage) are abstracted
//! behind traits. This crate provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod asset;
pub mod clock;
pub mod store;

pub use asset::NullAsset;
pub use clock::NullClock;
pub use store::NullRedemptionStore;
