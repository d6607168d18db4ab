//! The redemption ledger: deposits, vesting and payouts.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use iou_assets::{AssetError, FungibleAsset};
use iou_store::{RedemptionStore, StoreError};
use iou_types::{AccountId, BlockHeight, Clock, TokenAmount};
use tracing::{debug, info, warn};

use crate::config::LedgerConfig;
use crate::error::RedemptionError;
use crate::event::{EventBus, RedemptionEvent};
use crate::state::{AccountStatus, DepositRecord, VestingSchedule};

const META_BLOCKS_TO_RELEASE: &[u8] = b"blocks_to_release";

type Slot = Arc<Mutex<DepositRecord>>;

fn lock(slot: &Slot) -> MutexGuard<'_, DepositRecord> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Takes one IOU deposit per account and pays out the final asset as it
/// vests.
///
/// Account records live in an arena of per-account slots. A deposit or
/// redemption holds its account's slot lock from reading the record through
/// the asset transfer to the counter update, so calls on one account are
/// serialized while different accounts proceed in parallel.
pub struct RedemptionLedger {
    config: LedgerConfig,
    schedule: VestingSchedule,
    input: Arc<dyn FungibleAsset>,
    output: Arc<dyn FungibleAsset>,
    clock: Arc<dyn Clock>,
    accounts: RwLock<HashMap<AccountId, Slot>>,
    events: EventBus,
}

impl RedemptionLedger {
    /// Build a ledger pulling `input` at deposit and paying `output` at
    /// redemption. Fails if the release window is zero.
    pub fn new(
        config: LedgerConfig,
        input: Arc<dyn FungibleAsset>,
        output: Arc<dyn FungibleAsset>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, RedemptionError> {
        let schedule = config.schedule()?;
        Ok(Self {
            config,
            schedule,
            input,
            output,
            clock,
            accounts: RwLock::new(HashMap::new()),
            events: EventBus::new(),
        })
    }

    /// Register a listener for committed deposits and redemptions.
    pub fn subscribe(&mut self, listener: Box<dyn Fn(&RedemptionEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    fn slot(&self, account: &AccountId) -> Option<Slot> {
        self.accounts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(account)
            .cloned()
    }

    fn slot_or_insert(&self, account: &AccountId) -> Slot {
        if let Some(slot) = self.slot(account) {
            return slot;
        }
        self.accounts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(account.clone())
            .or_default()
            .clone()
    }

    /// Drop `slot` from the arena if it never received a deposit and no
    /// other call holds it. Must be called without the slot lock held.
    fn release_empty_slot(&self, account: &AccountId, slot: &Slot) {
        let mut accounts = self
            .accounts
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let ours = accounts
            .get(account)
            .is_some_and(|current| Arc::ptr_eq(current, slot));
        // Under the write lock nobody can clone the slot, so a count of two
        // (arena + caller) means no other call is waiting on it.
        if ours && Arc::strong_count(slot) == 2 && !lock(slot).has_deposited {
            accounts.remove(account);
        }
    }

    fn reject_custody(&self, account: &AccountId) -> Result<(), RedemptionError> {
        if account == &self.config.custody {
            warn!(account = %account, "custody account cannot take part in redemption");
            return Err(RedemptionError::CustodyAccount(account.clone()));
        }
        Ok(())
    }

    /// Pull `amount` of the input asset from `account` into custody and
    /// start its vesting clock.
    ///
    /// The account must have approved the custody account for at least
    /// `amount` beforehand. Allowed once per account, ever.
    pub fn deposit(
        &self,
        account: &AccountId,
        amount: TokenAmount,
    ) -> Result<DepositRecord, RedemptionError> {
        if amount.is_zero() {
            return Err(RedemptionError::ZeroAmount);
        }
        self.reject_custody(account)?;
        let slot = self.slot_or_insert(account);
        let mut record = lock(&slot);
        if record.has_deposited {
            warn!(account = %account, "rejected duplicate deposit");
            return Err(RedemptionError::AlreadyDeposited(account.clone()));
        }

        let now = self.clock.now();
        let custody = &self.config.custody;
        if let Err(source) = self.input.transfer_from(custody, account, custody, amount) {
            warn!(
                account = %account,
                asset = self.input.symbol(),
                error = %source,
                "deposit pull failed"
            );
            drop(record);
            self.release_empty_slot(account, &slot);
            return Err(RedemptionError::TransferFailed {
                asset: self.input.symbol().to_string(),
                source,
            });
        }

        *record = DepositRecord::new(amount, now);
        info!(account = %account, amount = %amount, block = %now, "deposit recorded");
        self.events.emit(&RedemptionEvent::Deposited {
            account: account.clone(),
            amount,
            block: now,
        });
        Ok(*record)
    }

    /// Pay `account` everything vested since its last redemption and return
    /// the amount paid.
    ///
    /// The caller is the account itself. A call with nothing newly vested
    /// succeeds with zero and moves no funds. The redeemed counter advances
    /// only after the payout transfer succeeds.
    pub fn redeem(&self, account: &AccountId) -> Result<TokenAmount, RedemptionError> {
        self.reject_custody(account)?;
        let slot = self
            .slot(account)
            .ok_or_else(|| RedemptionError::NoDeposit(account.clone()))?;
        let mut record = lock(&slot);
        if !record.has_deposited {
            return Err(RedemptionError::NoDeposit(account.clone()));
        }

        let now = self.clock.now();
        let vested = record
            .vested_checked(&self.schedule, now)
            .ok_or(RedemptionError::Overflow)?;
        let payable = vested.saturating_sub(record.amount_redeemed);
        if payable.is_zero() {
            debug!(account = %account, block = %now, "nothing newly vested");
            return Ok(TokenAmount::ZERO);
        }

        let custody = &self.config.custody;
        let available = self
            .output
            .balance_of(custody)
            .map_err(|source| self.output_failure(source))?;
        if available < payable {
            warn!(
                account = %account,
                needed = %payable,
                available = %available,
                "reserve cannot cover redemption"
            );
            return Err(RedemptionError::InsufficientReserve {
                needed: payable,
                available,
            });
        }

        self.output
            .transfer(custody, account, payable)
            .map_err(|source| match source {
                AssetError::InsufficientBalance { available, .. } => {
                    RedemptionError::InsufficientReserve {
                        needed: payable,
                        available,
                    }
                }
                other => self.output_failure(other),
            })?;

        // payable > 0 implies vested > amount_redeemed.
        record.amount_redeemed = vested;
        info!(
            account = %account,
            amount = %payable,
            total_redeemed = %vested,
            block = %now,
            "redemption paid"
        );
        self.events.emit(&RedemptionEvent::Redeemed {
            account: account.clone(),
            amount: payable,
            block: now,
            total_redeemed: vested,
        });
        Ok(payable)
    }

    fn output_failure(&self, source: AssetError) -> RedemptionError {
        warn!(asset = self.output.symbol(), error = %source, "payout transfer failed");
        RedemptionError::TransferFailed {
            asset: self.output.symbol().to_string(),
            source,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────────

    /// The account's record; all-zero with `has_deposited == false` if it
    /// never deposited.
    pub fn get_deposit(&self, account: &AccountId) -> DepositRecord {
        self.slot(account)
            .map(|slot| *lock(&slot))
            .unwrap_or_default()
    }

    /// Vesting window length in blocks.
    pub fn release_window(&self) -> u64 {
        self.schedule.blocks_to_release()
    }

    pub fn current_time(&self) -> BlockHeight {
        self.clock.now()
    }

    /// What [`Self::redeem`] would pay if called now.
    pub fn redeemable(&self, account: &AccountId) -> Result<TokenAmount, RedemptionError> {
        self.get_deposit(account)
            .payable_checked(&self.schedule, self.clock.now())
            .ok_or(RedemptionError::Overflow)
    }

    pub fn status(&self, account: &AccountId) -> AccountStatus {
        self.get_deposit(account).status()
    }

    /// Final-asset balance held in custody for payouts.
    pub fn reserve(&self) -> Result<TokenAmount, RedemptionError> {
        self.output
            .balance_of(&self.config.custody)
            .map_err(|source| self.output_failure(source))
    }

    /// IOU credit held in custody.
    pub fn held_input(&self) -> Result<TokenAmount, RedemptionError> {
        self.input
            .balance_of(&self.config.custody)
            .map_err(|source| RedemptionError::TransferFailed {
                asset: self.input.symbol().to_string(),
                source,
            })
    }

    /// Number of accounts that have deposited.
    pub fn depositor_count(&self) -> usize {
        self.accounts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|slot| lock(slot).has_deposited)
            .count()
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn schedule(&self) -> &VestingSchedule {
        &self.schedule
    }
}

impl RedemptionLedger {
    /// Persist every deposit record and the release window to a store.
    pub fn save_to_store(&self, store: &dyn RedemptionStore) -> Result<(), RedemptionError> {
        store.put_meta(
            META_BLOCKS_TO_RELEASE,
            &self.schedule.blocks_to_release().to_be_bytes(),
        )?;

        let accounts = self
            .accounts
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        for (account, slot) in accounts.iter() {
            let record = *lock(slot);
            if !record.has_deposited {
                continue;
            }
            let bytes = bincode::serialize(&record)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            store.put_deposit(account, &bytes)?;
        }
        debug!(accounts = accounts.len(), "ledger saved to store");
        Ok(())
    }

    /// Rebuild a ledger from a store written by [`Self::save_to_store`].
    ///
    /// Fails if the store was written with a different release window.
    pub fn load_from_store(
        config: LedgerConfig,
        input: Arc<dyn FungibleAsset>,
        output: Arc<dyn FungibleAsset>,
        clock: Arc<dyn Clock>,
        store: &dyn RedemptionStore,
    ) -> Result<Self, RedemptionError> {
        let ledger = Self::new(config, input, output, clock)?;

        if let Some(bytes) = store.get_meta(META_BLOCKS_TO_RELEASE)? {
            let raw: [u8; 8] = bytes.as_slice().try_into().map_err(|_| {
                StoreError::Corruption("blocks_to_release is not 8 bytes".to_string())
            })?;
            let stored = u64::from_be_bytes(raw);
            if stored != ledger.release_window() {
                return Err(RedemptionError::Config(format!(
                    "store was written with a {stored}-block window, config says {}",
                    ledger.release_window()
                )));
            }
        }

        let mut accounts = HashMap::new();
        for (account, bytes) in store.iter_deposits()? {
            let record: DepositRecord = bincode::deserialize(&bytes)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            if record.amount_redeemed > record.amount_deposited {
                return Err(StoreError::Corruption(format!(
                    "{account} redeemed more than it deposited"
                ))
                .into());
            }
            accounts.insert(account, Arc::new(Mutex::new(record)));
        }
        info!(accounts = accounts.len(), "ledger loaded from store");

        Ok(Self {
            accounts: RwLock::new(accounts),
            ..ledger
        })
    }
}
