//! Library side of the `iou-redeem` binary: scenario configuration, the
//! in-memory simulation driver and off-ledger vesting quotes.

pub mod config;
pub mod quote;
pub mod simulate;

pub use config::{AssetConfig, AssetKind, SimulationConfig, Step};
pub use quote::{quote, VestingQuote};
pub use simulate::{AccountView, Simulation, StepReport};
