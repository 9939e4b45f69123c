//! Names of the adapters and extensions a DAO registry can have registered.
//!
//! The registry keys adapters by `keccak256(name)`; the names below are the
//! ones used by the molochv3 contracts.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AdapterName {
    Bank,
    Configuration,
    Distribute,
    Financing,
    Guildkick,
    Onboarding,
    Offchainvoting,
    Managing,
    Ragequit,
    Tribute,
    Voting,
    Withdraw,
}

/// The `ADAPTER_NAME` constant a voting adapter contract reports.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
pub enum VotingAdapterName {
    OffchainVotingContract,
    VotingContract,
}

impl VotingAdapterName {
    /// Whether results are tallied off-chain and submitted with a reporter.
    pub fn is_offchain(self) -> bool {
        matches!(self, VotingAdapterName::OffchainVotingContract)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn names_round_trip_through_strings() {
        for name in AdapterName::iter() {
            assert_eq!(AdapterName::from_str(name.as_ref()).unwrap(), name);
        }
        assert_eq!(AdapterName::Offchainvoting.as_ref(), "offchainvoting");
        assert_eq!(AdapterName::Guildkick.to_string(), "guildkick");
    }

    #[test]
    fn voting_adapter_names() {
        let name = VotingAdapterName::from_str("OffchainVotingContract").unwrap();
        assert!(name.is_offchain());
        assert!(!VotingAdapterName::VotingContract.is_offchain());
        assert!(VotingAdapterName::from_str("offchain").is_err());
    }
}
