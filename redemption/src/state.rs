//! Per-account deposit records and the vesting schedule.

use crate::error::RedemptionError;
use iou_types::{BlockHeight, TokenAmount};
use serde::{Deserialize, Serialize};

/// Linear release of a deposit over a fixed number of blocks.
///
/// The schedule is global: every account vests over the same window,
/// starting from its own deposit block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingSchedule {
    blocks_to_release: u64,
}

impl VestingSchedule {
    pub fn new(blocks_to_release: u64) -> Result<Self, RedemptionError> {
        if blocks_to_release == 0 {
            return Err(RedemptionError::InvalidReleaseWindow);
        }
        Ok(Self { blocks_to_release })
    }

    pub fn blocks_to_release(&self) -> u64 {
        self.blocks_to_release
    }

    /// Amount of `principal` unlocked at `now` for a deposit made at
    /// `deposited_at`.
    ///
    /// `min(principal, floor(principal × elapsed / W))`. Elapsed blocks are
    /// clamped to the window before multiplying, so a fully elapsed window
    /// returns the principal exactly. Returns `None` if the product
    /// overflows.
    pub fn vested_checked(
        &self,
        principal: TokenAmount,
        deposited_at: BlockHeight,
        now: BlockHeight,
    ) -> Option<TokenAmount> {
        let elapsed = deposited_at.blocks_since(now).min(self.blocks_to_release);
        if elapsed == self.blocks_to_release {
            return Some(principal);
        }
        principal.checked_mul_div(elapsed as u128, self.blocks_to_release as u128)
    }

    /// First block at which a deposit made at `deposited_at` is fully vested.
    pub fn fully_vested_at(&self, deposited_at: BlockHeight) -> BlockHeight {
        deposited_at.saturating_add(self.blocks_to_release)
    }
}

/// Where an account is in its deposit/redeem lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    NotDeposited,
    Vesting,
    FullyRedeemed,
}

/// Deposit state for a single account.
///
/// Created once by a deposit; afterwards only `amount_redeemed` changes.
/// An account that never deposited reads as the all-zero default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositRecord {
    /// IOU credit pulled into custody at deposit.
    pub amount_deposited: TokenAmount,

    /// Block height at deposit; vesting starts here.
    pub block_deposited: BlockHeight,

    /// Total final asset paid out so far (cumulative, never decreases).
    pub amount_redeemed: TokenAmount,

    pub has_deposited: bool,
}

impl DepositRecord {
    pub fn new(amount: TokenAmount, at: BlockHeight) -> Self {
        Self {
            amount_deposited: amount,
            block_deposited: at,
            amount_redeemed: TokenAmount::ZERO,
            has_deposited: true,
        }
    }

    /// Total unlocked at `now`, including what was already redeemed.
    pub fn vested_checked(
        &self,
        schedule: &VestingSchedule,
        now: BlockHeight,
    ) -> Option<TokenAmount> {
        if !self.has_deposited {
            return Some(TokenAmount::ZERO);
        }
        schedule.vested_checked(self.amount_deposited, self.block_deposited, now)
    }

    /// Unlocked but not yet paid at `now`.
    pub fn payable_checked(
        &self,
        schedule: &VestingSchedule,
        now: BlockHeight,
    ) -> Option<TokenAmount> {
        let vested = self.vested_checked(schedule, now)?;
        Some(vested.saturating_sub(self.amount_redeemed))
    }

    /// Principal not yet paid out, vested or not.
    pub fn remaining(&self) -> TokenAmount {
        self.amount_deposited.saturating_sub(self.amount_redeemed)
    }

    pub fn status(&self) -> AccountStatus {
        if !self.has_deposited {
            AccountStatus::NotDeposited
        } else if self.amount_redeemed == self.amount_deposited {
            AccountStatus::FullyRedeemed
        } else {
            AccountStatus::Vesting
        }
    }
}
