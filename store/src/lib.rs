//! Abstract storage traits for the redemption ledger.
//!
//! Every storage backend (in-memory for testing, or a host chain's state
//! database) implements these traits. The ledger depends only on the traits.

pub mod error;
pub mod redemption;

pub use error::StoreError;
pub use redemption::RedemptionStore;
