//! Poller configuration.
//!
//! Settings are read from JSON, for example:
//!
//! ```json
//! {
//!   "poller": { "poll_interval_ms": 5000, "grace_period_code": 5 },
//!   "contracts": {
//!     "dao_registry": "0x2bd1f1a8b9a3b8b1e7a5c2d1f0e9c8b7a6f5e4d3",
//!     "multicall": "0xeefba1e63905ef1d7acba5a8513c70307c1ce441"
//!   }
//! }
//! ```

use crate::error::SettingsError;
use dao_core::{Address, StatusDeriver, VotingState};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, time::Duration};

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PollerSettings {
    pub poll_interval_ms: u64,
    /// `voteResult` code the voting adapter reports during the grace
    /// period.
    pub grace_period_code: u8,
}

impl Default for PollerSettings {
    fn default() -> Self {
        PollerSettings {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            grace_period_code: VotingState::GracePeriod.code(),
        }
    }
}

impl PollerSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn deriver(&self) -> StatusDeriver {
        StatusDeriver::new(VotingState::from(self.grace_period_code))
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.poll_interval_ms == 0 {
            return Err(SettingsError::ZeroPollInterval);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContractAddresses {
    pub dao_registry: Address,
    pub multicall: Address,
    /// Looked up from the registry when not given.
    #[serde(default)]
    pub voting_adapter: Option<Address>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub poller: PollerSettings,
    pub contracts: ContractAddresses,
}

impl Settings {
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.poller.validate()?;
        Ok(settings)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}
