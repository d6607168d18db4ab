//! Ledger configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;

use iou_types::AccountId;

use crate::error::RedemptionError;
use crate::state::VestingSchedule;

/// Construction parameters for a [`crate::RedemptionLedger`].
///
/// Immutable once the ledger is built. Can be loaded from a TOML table via
/// [`LedgerConfig::from_toml_str`] or built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Account that holds deposited IOU credit and the final-asset reserve.
    #[serde(default = "default_custody")]
    pub custody: AccountId,

    /// Length of the vesting window in blocks. Must be positive.
    pub blocks_to_release: u64,
}

fn default_custody() -> AccountId {
    AccountId::new("redemption_ledger")
}

impl LedgerConfig {
    pub fn new(custody: AccountId, blocks_to_release: u64) -> Self {
        Self {
            custody,
            blocks_to_release,
        }
    }

    /// Check the parameters and build the vesting schedule they describe.
    pub fn schedule(&self) -> Result<VestingSchedule, RedemptionError> {
        if !self.custody.is_valid() {
            return Err(RedemptionError::Config(format!(
                "invalid custody account {:?}",
                self.custody.as_str()
            )));
        }
        VestingSchedule::new(self.blocks_to_release)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, RedemptionError> {
        let config: Self =
            toml::from_str(contents).map_err(|e| RedemptionError::Config(e.to_string()))?;
        config.schedule()?;
        Ok(config)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, RedemptionError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            RedemptionError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_full_table() {
        let config = LedgerConfig::from_toml_str(
            r#"
            custody = "iou_vault"
            blocks_to_release = 5
            "#,
        )
        .unwrap();
        assert_eq!(config, LedgerConfig::new(AccountId::new("iou_vault"), 5));
    }

    #[test]
    fn custody_has_default() {
        let config = LedgerConfig::from_toml_str("blocks_to_release = 40320").unwrap();
        assert_eq!(config.custody, AccountId::new("redemption_ledger"));
    }

    #[test]
    fn zero_window_rejected() {
        let err = LedgerConfig::from_toml_str("blocks_to_release = 0").unwrap_err();
        assert!(matches!(err, RedemptionError::InvalidReleaseWindow));
    }

    #[test]
    fn missing_window_rejected() {
        let err = LedgerConfig::from_toml_str(r#"custody = "vault""#).unwrap_err();
        assert!(matches!(err, RedemptionError::Config(_)));
    }

    #[test]
    fn blank_custody_rejected() {
        let err = LedgerConfig::from_toml_str(
            r#"
            custody = ""
            blocks_to_release = 5
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, RedemptionError::Config(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "blocks_to_release = 12").unwrap();
        let config = LedgerConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.blocks_to_release, 12);
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = LedgerConfig::from_toml_file(Path::new("/nonexistent/ledger.toml")).unwrap_err();
        assert!(matches!(err, RedemptionError::Config(_)));
    }
}
