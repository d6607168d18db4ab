//! Replays scripted steps against an in-memory ledger deployment.

use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Context;
use serde::Serialize;

use iou_assets::{FungibleAsset, MemoryAsset};
use iou_redemption::{AccountStatus, RedemptionError, RedemptionEvent, RedemptionLedger};
use iou_types::{AccountId, BlockCounter, BlockHeight, Clock, TokenAmount};

use crate::config::{AssetKind, SimulationConfig, Step};

/// Read-only view of an account, amounts rendered as decimal strings.
#[derive(Clone, Debug, Serialize)]
pub struct AccountView {
    pub account: AccountId,
    pub amount_deposited: String,
    pub block_deposited: u64,
    pub amount_redeemed: String,
    pub has_deposited: bool,
    pub status: AccountStatus,
    pub redeemable: String,
    pub input_balance: String,
    pub output_balance: String,
}

/// Outcome of one step.
#[derive(Clone, Debug, Serialize)]
pub struct StepReport {
    pub step: usize,
    pub action: &'static str,
    pub block: u64,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<AccountView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<RedemptionEvent>,
}

/// A ledger wired to two in-memory assets and a block counter.
pub struct Simulation {
    input: Arc<MemoryAsset>,
    output: Arc<MemoryAsset>,
    clock: Arc<BlockCounter>,
    ledger: RedemptionLedger,
    journal: Arc<Mutex<Vec<RedemptionEvent>>>,
}

impl Simulation {
    pub fn new(config: &SimulationConfig) -> Result<Self, RedemptionError> {
        let input = Arc::new(MemoryAsset::new(
            config.input.symbol.clone(),
            config.input.issuer.clone(),
            config.input.supply,
        ));
        let output = Arc::new(MemoryAsset::new(
            config.output.symbol.clone(),
            config.output.issuer.clone(),
            config.output.supply,
        ));
        let clock = Arc::new(BlockCounter::new(BlockHeight::new(config.start_block)));
        let mut ledger = RedemptionLedger::new(
            config.ledger.clone(),
            input.clone(),
            output.clone(),
            clock.clone(),
        )?;

        let journal = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&journal);
        ledger.subscribe(Box::new(move |event| {
            tracing::debug!(account = %event.account(), "ledger event");
            sink.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(event.clone());
        }));

        Ok(Self {
            input,
            output,
            clock,
            ledger,
            journal,
        })
    }

    pub fn ledger(&self) -> &RedemptionLedger {
        &self.ledger
    }

    fn custody(&self) -> &AccountId {
        &self.ledger.config().custody
    }

    fn asset(&self, kind: AssetKind) -> &MemoryAsset {
        match kind {
            AssetKind::Input => self.input.as_ref(),
            AssetKind::Output => self.output.as_ref(),
        }
    }

    pub fn view(&self, account: &AccountId) -> anyhow::Result<AccountView> {
        let record = self.ledger.get_deposit(account);
        Ok(AccountView {
            account: account.clone(),
            amount_deposited: record.amount_deposited.to_string(),
            block_deposited: record.block_deposited.as_u64(),
            amount_redeemed: record.amount_redeemed.to_string(),
            has_deposited: record.has_deposited,
            status: record.status(),
            redeemable: self.ledger.redeemable(account)?.to_string(),
            input_balance: self.input.balance_of(account)?.to_string(),
            output_balance: self.output.balance_of(account)?.to_string(),
        })
    }

    fn execute(&self, step: &Step) -> anyhow::Result<(Option<TokenAmount>, Option<AccountView>)> {
        match step {
            Step::Fund { from, amount } => {
                self.output
                    .transfer(from, self.custody(), *amount)
                    .context("reserve funding failed")?;
                Ok((Some(*amount), None))
            }
            Step::Transfer {
                asset,
                from,
                to,
                amount,
            } => {
                self.asset(*asset).transfer(from, to, *amount)?;
                Ok((Some(*amount), None))
            }
            Step::Approve { account, amount } => {
                self.input.approve(account, self.custody(), *amount);
                Ok((Some(*amount), None))
            }
            Step::Deposit { account, amount } => {
                self.ledger.deposit(account, *amount)?;
                Ok((Some(*amount), Some(self.view(account)?)))
            }
            Step::Redeem { account } => {
                let paid = self.ledger.redeem(account)?;
                Ok((Some(paid), Some(self.view(account)?)))
            }
            Step::Advance { blocks } => {
                self.clock.advance(*blocks);
                Ok((None, None))
            }
            Step::AdvanceTo { block } => {
                self.clock.set(BlockHeight::new(*block));
                Ok((None, None))
            }
            Step::Query { account } => Ok((None, Some(self.view(account)?))),
        }
    }

    /// Run one step; failures are reported, not returned.
    pub fn apply(&self, index: usize, step: &Step) -> StepReport {
        let result = self.execute(step);
        let events = std::mem::take(
            &mut *self
                .journal
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        let block = self.clock.now().as_u64();
        match result {
            Ok((amount, account)) => StepReport {
                step: index,
                action: step.name(),
                block,
                ok: true,
                amount: amount.map(|a| a.to_string()),
                account,
                error: None,
                events,
            },
            Err(e) => {
                tracing::warn!(step = index, action = step.name(), error = %e, "step failed");
                StepReport {
                    step: index,
                    action: step.name(),
                    block,
                    ok: false,
                    amount: None,
                    account: None,
                    error: Some(format!("{e:#}")),
                    events,
                }
            }
        }
    }

    /// Run every step in order, stopping after the first failure when
    /// `fail_fast` is set.
    pub fn run(&self, steps: &[Step], fail_fast: bool) -> Vec<StepReport> {
        let mut reports = Vec::with_capacity(steps.len());
        for (i, step) in steps.iter().enumerate() {
            let report = self.apply(i + 1, step);
            let failed = !report.ok;
            reports.push(report);
            if failed && fail_fast {
                break;
            }
        }
        reports
    }
}
