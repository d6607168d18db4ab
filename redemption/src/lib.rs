//! IOU redemption ledger.
//!
//! An account deposits IOU credit exactly once. The same amount of the final
//! asset then unlocks linearly over a fixed number of blocks:
//! `vested = min(D, floor(D × elapsed / W))`
//!
//! This crate handles:
//! - Pulling the one-time deposit into ledger custody
//! - Vesting computation from block height and deposit record
//! - Paying out the newly vested delta on each redemption
//! - Persisting records to a [`iou_store::RedemptionStore`]

pub mod config;
pub mod error;
pub mod event;
pub mod ledger;
pub mod state;

pub use config::LedgerConfig;
pub use error::RedemptionError;
pub use event::{EventBus, RedemptionEvent};
pub use ledger::RedemptionLedger;
pub use state::{AccountStatus, DepositRecord, VestingSchedule};
