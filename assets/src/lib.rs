//! Fungible asset collaborators.
//!
//! The redemption ledger never moves balances itself. It holds two
//! [`FungibleAsset`] handles: the IOU credit pulled at deposit and the final
//! asset paid out at redemption. [`MemoryAsset`] is the in-process
//! implementation used by the CLI and integration tests.

pub mod asset;
pub mod error;
pub mod memory;

pub use asset::FungibleAsset;
pub use error::AssetError;
pub use memory::MemoryAsset;
