//! Shared utilities for the IOU redemption ledger.

pub mod logging;
pub mod time;

pub use logging::{init_logging, LogFormat};
pub use time::{format_blocks, format_duration};
