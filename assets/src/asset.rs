use crate::AssetError;
use iou_types::{AccountId, TokenAmount};

/// A fungible asset the ledger can query and move.
///
/// Transfers are synchronous and all-or-nothing: an `Err` means no balance
/// changed.
pub trait FungibleAsset: Send + Sync {
    /// Ticker used in logs and error messages.
    fn symbol(&self) -> &str;

    fn balance_of(&self, account: &AccountId) -> Result<TokenAmount, AssetError>;

    /// Move `amount` from `from` to `to`, authorised by `from` itself.
    fn transfer(
        &self,
        from: &AccountId,
        to: &AccountId,
        amount: TokenAmount,
    ) -> Result<(), AssetError>;

    /// Pull `amount` from `from` to `to` on behalf of `spender`, consuming
    /// an allowance `from` granted to `spender` beforehand.
    fn transfer_from(
        &self,
        spender: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: TokenAmount,
    ) -> Result<(), AssetError>;
}
