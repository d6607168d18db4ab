//! Fundamental types for the IOU redemption ledger.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! account identifiers, fixed-point token amounts, block heights and the clock
//! abstraction the ledger reads time from.

pub mod account;
pub mod amount;
pub mod error;
pub mod time;

pub use account::AccountId;
pub use amount::TokenAmount;
pub use error::AmountParseError;
pub use time::{BlockCounter, BlockHeight, Clock};
