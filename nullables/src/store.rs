//! Nullable store — thread-safe in-memory storage for testing.

use iou_store::{RedemptionStore, StoreError};
use iou_types::AccountId;
use std::collections::HashMap;
use std::sync::Mutex;

/// An in-memory redemption store for testing.
pub struct NullRedemptionStore {
    deposits: Mutex<HashMap<AccountId, Vec<u8>>>,
    meta: Mutex<HashMap<Vec<u8>, Vec<u8>>>,
}

impl NullRedemptionStore {
    pub fn new() -> Self {
        Self {
            deposits: Mutex::new(HashMap::new()),
            meta: Mutex::new(HashMap::new()),
        }
    }

    pub fn deposit_count(&self) -> usize {
        self.deposits.lock().unwrap().len()
    }
}

impl Default for NullRedemptionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RedemptionStore for NullRedemptionStore {
    fn get_deposit(&self, account: &AccountId) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.deposits.lock().unwrap().get(account).cloned())
    }

    fn put_deposit(&self, account: &AccountId, record: &[u8]) -> Result<(), StoreError> {
        self.deposits
            .lock()
            .unwrap()
            .insert(account.clone(), record.to_vec());
        Ok(())
    }

    fn iter_deposits(&self) -> Result<Vec<(AccountId, Vec<u8>)>, StoreError> {
        Ok(self
            .deposits
            .lock()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn get_meta(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.meta.lock().unwrap().get(key).cloned())
    }

    fn put_meta(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.meta
            .lock()
            .unwrap()
            .insert(key.to_vec(), value.to_vec());
        Ok(())
    }
}
