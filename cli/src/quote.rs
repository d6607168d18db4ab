//! Off-ledger vesting arithmetic for a single hypothetical deposit.

use serde::Serialize;

use iou_redemption::{RedemptionError, VestingSchedule};
use iou_types::{BlockHeight, TokenAmount};
use iou_utils::format_blocks;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VestingQuote {
    pub deposited: String,
    pub elapsed_blocks: u64,
    pub vested: String,
    pub payable: String,
    pub locked: String,
    pub blocks_until_full: u64,
    pub time_until_full: String,
}

/// Vesting position of `amount` deposited `elapsed` blocks ago, with
/// `redeemed` already paid out.
pub fn quote(
    amount: TokenAmount,
    window: u64,
    elapsed: u64,
    redeemed: TokenAmount,
    block_time_secs: u64,
) -> Result<VestingQuote, RedemptionError> {
    let schedule = VestingSchedule::new(window)?;
    let now = BlockHeight::new(elapsed);
    let vested = schedule
        .vested_checked(amount, BlockHeight::GENESIS, now)
        .ok_or(RedemptionError::Overflow)?;
    let blocks_until_full = schedule
        .fully_vested_at(BlockHeight::GENESIS)
        .as_u64()
        .saturating_sub(elapsed);

    Ok(VestingQuote {
        deposited: amount.to_string(),
        elapsed_blocks: elapsed,
        vested: vested.to_string(),
        payable: vested.saturating_sub(redeemed).to_string(),
        locked: amount.saturating_sub(vested).to_string(),
        blocks_until_full,
        time_until_full: format_blocks(blocks_until_full, block_time_secs),
    })
}
