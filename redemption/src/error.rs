//! Redemption ledger errors.

use iou_assets::AssetError;
use iou_store::StoreError;
use iou_types::{AccountId, TokenAmount};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RedemptionError {
    #[error("This account has already deposited")]
    AlreadyDeposited(AccountId),

    #[error("account {0} has not deposited")]
    NoDeposit(AccountId),

    #[error("custody account {0} cannot deposit or redeem")]
    CustodyAccount(AccountId),

    #[error("deposit amount must be non-zero")]
    ZeroAmount,

    #[error("{asset} transfer failed: {source}")]
    TransferFailed {
        asset: String,
        #[source]
        source: AssetError,
    },

    #[error("insufficient reserve: need {needed}, ledger holds {available}")]
    InsufficientReserve {
        needed: TokenAmount,
        available: TokenAmount,
    },

    #[error("release window must be at least one block")]
    InvalidReleaseWindow,

    #[error("arithmetic overflow in vesting computation")]
    Overflow,

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("configuration error: {0}")]
    Config(String),
}

impl RedemptionError {
    /// Whether the same call can succeed later once an outside condition
    /// changes (allowance granted, reserve topped up).
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::TransferFailed { .. } | Self::InsufficientReserve { .. } | Self::Store(_)
        )
    }
}
