use crate::StoreError;
use iou_types::AccountId;

/// Durable storage for redemption ledger state.
///
/// Values are opaque bytes so backends don't depend on the `iou-redemption`
/// crate; the ledger encodes and decodes its own records.
pub trait RedemptionStore {
    fn get_deposit(&self, account: &AccountId) -> Result<Option<Vec<u8>>, StoreError>;
    fn put_deposit(&self, account: &AccountId, record: &[u8]) -> Result<(), StoreError>;
    fn iter_deposits(&self) -> Result<Vec<(AccountId, Vec<u8>)>, StoreError>;

    fn get_meta(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;
    fn put_meta(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;

    /// Like [`Self::get_deposit`], but a missing record is an error.
    fn require_deposit(&self, account: &AccountId) -> Result<Vec<u8>, StoreError> {
        self.get_deposit(account)?
            .ok_or_else(|| StoreError::NotFound(account.clone()))
    }
}
