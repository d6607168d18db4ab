//! Simulation configuration with TOML file support.

use anyhow::Context;
use serde::{Deserialize, Deserializer};
use std::path::Path;

use iou_redemption::LedgerConfig;
use iou_types::{AccountId, TokenAmount};
use iou_utils::LogFormat;

/// A ledger deployment plus a script of steps to replay against it.
#[derive(Clone, Debug, Deserialize)]
pub struct SimulationConfig {
    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Block height when the ledger is deployed.
    #[serde(default)]
    pub start_block: u64,

    pub ledger: LedgerConfig,

    /// The IOU credit pulled at deposit.
    pub input: AssetConfig,

    /// The final asset paid at redemption.
    pub output: AssetConfig,

    #[serde(default)]
    pub steps: Vec<Step>,
}

/// An in-memory asset whose whole supply starts with `issuer`.
#[derive(Clone, Debug, Deserialize)]
pub struct AssetConfig {
    pub symbol: String,
    pub issuer: AccountId,
    #[serde(deserialize_with = "amount_from_str")]
    pub supply: TokenAmount,
}

/// Which of the two assets a transfer step moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Input,
    Output,
}

/// One scripted action.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Move output asset from `from` into ledger custody.
    Fund {
        from: AccountId,
        #[serde(deserialize_with = "amount_from_str")]
        amount: TokenAmount,
    },
    /// Plain transfer between two accounts.
    Transfer {
        asset: AssetKind,
        from: AccountId,
        to: AccountId,
        #[serde(deserialize_with = "amount_from_str")]
        amount: TokenAmount,
    },
    /// Let the ledger pull up to `amount` of input asset from `account`.
    Approve {
        account: AccountId,
        #[serde(deserialize_with = "amount_from_str")]
        amount: TokenAmount,
    },
    Deposit {
        account: AccountId,
        #[serde(deserialize_with = "amount_from_str")]
        amount: TokenAmount,
    },
    Redeem {
        account: AccountId,
    },
    /// Produce `blocks` new blocks.
    Advance {
        blocks: u64,
    },
    /// Produce blocks up to height `block`; earlier heights are ignored.
    AdvanceTo {
        block: u64,
    },
    /// Report an account's record without changing anything.
    Query {
        account: AccountId,
    },
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Fund { .. } => "fund",
            Self::Transfer { .. } => "transfer",
            Self::Approve { .. } => "approve",
            Self::Deposit { .. } => "deposit",
            Self::Redeem { .. } => "redeem",
            Self::Advance { .. } => "advance",
            Self::AdvanceTo { .. } => "advance_to",
            Self::Query { .. } => "query",
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn amount_from_str<'de, D>(deserializer: D) -> Result<TokenAmount, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
}

impl SimulationConfig {
    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(contents).context("invalid simulation config")?;
        config.ledger.schedule()?;
        Ok(config)
    }

    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&contents).with_context(|| format!("in {}", path.display()))
    }
}
