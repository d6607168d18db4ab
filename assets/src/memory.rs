//! In-memory fungible asset with a fixed supply.

use crate::{AssetError, FungibleAsset};
use iou_types::{AccountId, TokenAmount};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct AssetBook {
    balances: HashMap<AccountId, TokenAmount>,
    allowances: HashMap<(AccountId, AccountId), TokenAmount>,
}

impl AssetBook {
    fn balance(&self, account: &AccountId) -> TokenAmount {
        self.balances.get(account).copied().unwrap_or(TokenAmount::ZERO)
    }

    fn allowance(&self, owner: &AccountId, spender: &AccountId) -> TokenAmount {
        self.allowances
            .get(&(owner.clone(), spender.clone()))
            .copied()
            .unwrap_or(TokenAmount::ZERO)
    }

    /// Debit `from` and credit `to`, or change nothing.
    fn move_balance(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: TokenAmount,
    ) -> Result<(), AssetError> {
        if amount.is_zero() {
            return Err(AssetError::ZeroAmount);
        }
        let available = self.balance(from);
        let debited = available
            .checked_sub(amount)
            .ok_or_else(|| AssetError::InsufficientBalance {
                account: from.clone(),
                needed: amount,
                available,
            })?;
        if from == to {
            return Ok(());
        }
        let credited = self
            .balance(to)
            .checked_add(amount)
            .ok_or(AssetError::Overflow)?;
        self.balances.insert(from.clone(), debited);
        self.balances.insert(to.clone(), credited);
        Ok(())
    }
}

/// A fungible asset kept entirely in memory.
///
/// The whole supply is minted to `issuer` at construction; nothing is minted
/// or burned afterwards. Thread-safe: every operation runs under one lock, so
/// a `transfer_from` checks and consumes the allowance atomically with the
/// balance move.
pub struct MemoryAsset {
    symbol: String,
    total_supply: TokenAmount,
    book: Mutex<AssetBook>,
}

impl MemoryAsset {
    pub fn new(symbol: impl Into<String>, issuer: AccountId, supply: TokenAmount) -> Self {
        let mut book = AssetBook::default();
        if !supply.is_zero() {
            book.balances.insert(issuer, supply);
        }
        Self {
            symbol: symbol.into(),
            total_supply: supply,
            book: Mutex::new(book),
        }
    }

    fn book(&self) -> MutexGuard<'_, AssetBook> {
        self.book.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn total_supply(&self) -> TokenAmount {
        self.total_supply
    }

    /// Allow `spender` to pull up to `amount` from `owner`. Replaces any
    /// previous allowance.
    pub fn approve(&self, owner: &AccountId, spender: &AccountId, amount: TokenAmount) {
        tracing::debug!(
            asset = %self.symbol,
            owner = %owner,
            spender = %spender,
            amount = %amount,
            "allowance set"
        );
        self.book()
            .allowances
            .insert((owner.clone(), spender.clone()), amount);
    }

    pub fn allowance(&self, owner: &AccountId, spender: &AccountId) -> TokenAmount {
        self.book().allowance(owner, spender)
    }

    /// All non-zero balances, sorted by account.
    pub fn holders(&self) -> Vec<(AccountId, TokenAmount)> {
        let mut holders: Vec<_> = self
            .book()
            .balances
            .iter()
            .filter(|(_, amount)| !amount.is_zero())
            .map(|(account, amount)| (account.clone(), *amount))
            .collect();
        holders.sort();
        holders
    }
}

impl FungibleAsset for MemoryAsset {
    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn balance_of(&self, account: &AccountId) -> Result<TokenAmount, AssetError> {
        Ok(self.book().balance(account))
    }

    fn transfer(
        &self,
        from: &AccountId,
        to: &AccountId,
        amount: TokenAmount,
    ) -> Result<(), AssetError> {
        self.book().move_balance(from, to, amount)
    }

    fn transfer_from(
        &self,
        spender: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: TokenAmount,
    ) -> Result<(), AssetError> {
        let mut book = self.book();
        let available = book.allowance(from, spender);
        let remaining =
            available
                .checked_sub(amount)
                .ok_or_else(|| AssetError::InsufficientAllowance {
                    owner: from.clone(),
                    spender: spender.clone(),
                    needed: amount,
                    available,
                })?;
        book.move_balance(from, to, amount)?;
        book.allowances
            .insert((from.clone(), spender.clone()), remaining);
        Ok(())
    }
}
