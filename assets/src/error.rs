//! Asset transfer errors.

use iou_types::{AccountId, TokenAmount};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AssetError {
    #[error("insufficient balance in {account}: need {needed}, have {available}")]
    InsufficientBalance {
        account: AccountId,
        needed: TokenAmount,
        available: TokenAmount,
    },

    #[error("insufficient allowance from {owner} to {spender}: need {needed}, have {available}")]
    InsufficientAllowance {
        owner: AccountId,
        spender: AccountId,
        needed: TokenAmount,
        available: TokenAmount,
    },

    #[error("transfer amount must be non-zero")]
    ZeroAmount,

    #[error("arithmetic overflow in asset balance")]
    Overflow,

    #[error("transfer rejected: {0}")]
    Rejected(String),
}
