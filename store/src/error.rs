use iou_types::AccountId;
use thiserror::Error;

/// Failures reported by a [`crate::RedemptionStore`] backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no stored deposit for account {0}")]
    NotFound(AccountId),

    #[error("store backend failed: {0}")]
    Backend(String),

    #[error("could not encode or decode a stored value: {0}")]
    Serialization(String),

    #[error("stored ledger state is inconsistent: {0}")]
    Corruption(String),
}
