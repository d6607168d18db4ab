//! Events emitted when deposits and redemptions commit.

use iou_types::{AccountId, BlockHeight, TokenAmount};
use serde::{Deserialize, Serialize};

/// A committed ledger mutation. Zero-payable redemptions emit nothing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RedemptionEvent {
    /// IOU credit was pulled into custody and a deposit record created.
    Deposited {
        account: AccountId,
        amount: TokenAmount,
        block: BlockHeight,
    },
    /// Newly vested final asset was paid out.
    Redeemed {
        account: AccountId,
        amount: TokenAmount,
        block: BlockHeight,
        total_redeemed: TokenAmount,
    },
}

impl RedemptionEvent {
    pub fn account(&self) -> &AccountId {
        match self {
            Self::Deposited { account, .. } | Self::Redeemed { account, .. } => account,
        }
    }
}

/// Synchronous fan-out event bus for ledger events.
///
/// Listeners are invoked inline while the account's lock is held; keep
/// handlers fast and never call back into the ledger from one.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&RedemptionEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&RedemptionEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &RedemptionEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
