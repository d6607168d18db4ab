//! Nullable asset — scriptable balances and failures for testing.

use iou_assets::{AssetError, FungibleAsset};
use iou_types::{AccountId, TokenAmount};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// A fungible asset whose behaviour tests control directly.
///
/// Balances are set by hand, pulls ignore allowances, and every transfer
/// can be made to fail on demand.
pub struct NullAsset {
    symbol: String,
    balances: Mutex<HashMap<AccountId, TokenAmount>>,
    reported: Mutex<HashMap<AccountId, TokenAmount>>,
    rejection: Mutex<Option<String>>,
    transfers: AtomicU64,
}

impl NullAsset {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            balances: Mutex::new(HashMap::new()),
            reported: Mutex::new(HashMap::new()),
            rejection: Mutex::new(None),
            transfers: AtomicU64::new(0),
        }
    }

    pub fn set_balance(&self, account: &AccountId, amount: TokenAmount) {
        self.balances
            .lock()
            .unwrap()
            .insert(account.clone(), amount);
    }

    /// Make `balance_of(account)` answer `amount` regardless of the real
    /// balance, like a read that is stale by the time a transfer runs.
    /// Transfers still check the real balance.
    pub fn report_balance(&self, account: &AccountId, amount: TokenAmount) {
        self.reported
            .lock()
            .unwrap()
            .insert(account.clone(), amount);
    }

    /// Fail every following transfer with `AssetError::Rejected(reason)`.
    pub fn reject_transfers(&self, reason: impl Into<String>) {
        *self.rejection.lock().unwrap() = Some(reason.into());
    }

    pub fn accept_transfers(&self) {
        *self.rejection.lock().unwrap() = None;
    }

    /// Number of transfers that succeeded.
    pub fn transfer_count(&self) -> u64 {
        self.transfers.load(Ordering::SeqCst)
    }

    fn move_balance(
        &self,
        from: &AccountId,
        to: &AccountId,
        amount: TokenAmount,
    ) -> Result<(), AssetError> {
        if let Some(reason) = self.rejection.lock().unwrap().clone() {
            return Err(AssetError::Rejected(reason));
        }
        let mut balances = self.balances.lock().unwrap();
        let available = balances.get(from).copied().unwrap_or_default();
        let debited = available
            .checked_sub(amount)
            .ok_or_else(|| AssetError::InsufficientBalance {
                account: from.clone(),
                needed: amount,
                available,
            })?;
        balances.insert(from.clone(), debited);
        let credited = balances.get(to).copied().unwrap_or_default() + amount;
        balances.insert(to.clone(), credited);
        self.transfers.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl FungibleAsset for NullAsset {
    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn balance_of(&self, account: &AccountId) -> Result<TokenAmount, AssetError> {
        if let Some(reported) = self.reported.lock().unwrap().get(account) {
            return Ok(*reported);
        }
        Ok(self
            .balances
            .lock()
            .unwrap()
            .get(account)
            .copied()
            .unwrap_or_default())
    }

    fn transfer(
        &self,
        from: &AccountId,
        to: &AccountId,
        amount: TokenAmount,
    ) -> Result<(), AssetError> {
        self.move_balance(from, to, amount)
    }

    fn transfer_from(
        &self,
        _spender: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: TokenAmount,
    ) -> Result<(), AssetError> {
        self.move_balance(from, to, amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_can_be_toggled() {
        let asset = NullAsset::new("HEGIC");
        let a = AccountId::new("a");
        let b = AccountId::new("b");
        asset.set_balance(&a, TokenAmount::new(10));

        asset.reject_transfers("paused");
        assert_eq!(
            asset.transfer(&a, &b, TokenAmount::new(5)),
            Err(AssetError::Rejected("paused".into()))
        );
        assert_eq!(asset.transfer_count(), 0);

        asset.accept_transfers();
        asset.transfer(&a, &b, TokenAmount::new(5)).unwrap();
        assert_eq!(asset.balance_of(&b).unwrap(), TokenAmount::new(5));
        assert_eq!(asset.transfer_count(), 1);
    }

    #[test]
    fn reported_balance_masks_real_balance() {
        let asset = NullAsset::new("HEGIC");
        let a = AccountId::new("a");
        let b = AccountId::new("b");
        asset.set_balance(&a, TokenAmount::new(5));
        asset.report_balance(&a, TokenAmount::new(100));

        assert_eq!(asset.balance_of(&a).unwrap(), TokenAmount::new(100));
        assert!(matches!(
            asset.transfer(&a, &b, TokenAmount::new(50)),
            Err(AssetError::InsufficientBalance { available, .. }) if available == TokenAmount::new(5)
        ));
    }
}
