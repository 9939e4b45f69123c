use crate::{
    address::{is_not_zero_address, Address},
    flags::ProposalFlags,
};
use ethereum_types::{H256, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a proposal inside the DAO registry (`bytes32`).
pub type ProposalId = H256;

/// A proposal as returned by `DaoRegistry.proposals(bytes32)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaoProposal {
    /// The adapter that submitted the proposal.
    pub adapter_address: Address,
    pub flags: ProposalFlags,
}

impl DaoProposal {
    /// The registry returns a zeroed struct for unknown ids, so a proposal
    /// without the `exists` bit is treated as absent.
    pub fn exists(&self) -> bool {
        self.flags.exists()
    }
}

/// The result code of a voting adapter's `voteResult(dao, proposalId)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VotingState {
    NotStarted,
    Tie,
    Pass,
    NotPass,
    InProgress,
    GracePeriod,
    /// A code this client does not know about, kept verbatim.
    Other(u8),
}

impl VotingState {
    pub fn code(self) -> u8 {
        match self {
            VotingState::NotStarted => 0,
            VotingState::Tie => 1,
            VotingState::Pass => 2,
            VotingState::NotPass => 3,
            VotingState::InProgress => 4,
            VotingState::GracePeriod => 5,
            VotingState::Other(code) => code,
        }
    }
}

impl From<u8> for VotingState {
    fn from(code: u8) -> Self {
        match code {
            0 => VotingState::NotStarted,
            1 => VotingState::Tie,
            2 => VotingState::Pass,
            3 => VotingState::NotPass,
            4 => VotingState::InProgress,
            5 => VotingState::GracePeriod,
            other => VotingState::Other(other),
        }
    }
}

impl fmt::Display for VotingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VotingState::NotStarted => f.write_str("NOT_STARTED"),
            VotingState::Tie => f.write_str("TIE"),
            VotingState::Pass => f.write_str("PASS"),
            VotingState::NotPass => f.write_str("NOT_PASS"),
            VotingState::InProgress => f.write_str("IN_PROGRESS"),
            VotingState::GracePeriod => f.write_str("GRACE_PERIOD"),
            VotingState::Other(code) => write!(f, "UNKNOWN({})", code),
        }
    }
}

/// Vote data held by an off-chain voting adapter for one proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    /// Who submitted the vote result. The null address until a result is in.
    pub reporter: Address,
    pub result_root: H256,
    pub nb_yes: U256,
    pub nb_no: U256,
    /// Seconds since the unix epoch.
    pub starting_time: u64,
    /// Seconds since the unix epoch; zero until a result is submitted.
    pub grace_period_starting_time: u64,
    pub is_challenged: bool,
    pub index: U256,
}

impl VoteTally {
    /// A result was submitted once a real reporter is recorded.
    pub fn result_submitted(&self) -> bool {
        is_not_zero_address(&self.reporter)
    }

    /// Start of the grace period countdown, in milliseconds.
    pub fn grace_period_start_ms(&self) -> u64 {
        self.grace_period_starting_time.saturating_mul(1000)
    }
}

impl Default for VoteTally {
    fn default() -> Self {
        VoteTally {
            reporter: Address::zero(),
            result_root: H256::zero(),
            nb_yes: U256::zero(),
            nb_no: U256::zero(),
            starting_time: 0,
            grace_period_starting_time: 0,
            is_challenged: false,
            index: U256::zero(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::parse_address;

    #[test]
    fn voting_state_codes() {
        for code in 0..=5u8 {
            let state = VotingState::from(code);
            assert!(!matches!(state, VotingState::Other(_)));
            assert_eq!(state.code(), code);
        }
        assert_eq!(VotingState::from(42), VotingState::Other(42));
        assert_eq!(VotingState::Other(42).code(), 42);
        assert_eq!(VotingState::GracePeriod.to_string(), "GRACE_PERIOD");
    }

    #[test]
    fn tally_submission_follows_reporter() {
        let mut tally = VoteTally::default();
        assert!(!tally.result_submitted());

        tally.reporter = parse_address("0x5a1b2c3d4e5f60718293a4b5c6d7e8f901234567").unwrap();
        tally.grace_period_starting_time = 1_620_000_000;
        assert!(tally.result_submitted());
        assert_eq!(tally.grace_period_start_ms(), 1_620_000_000_000);
    }

    #[test]
    fn proposal_json_shape() {
        let proposal = DaoProposal {
            adapter_address: Address::zero(),
            flags: ProposalFlags::from_bits(3),
        };
        let json = serde_json::to_value(&proposal).unwrap();
        assert_eq!(json["flags"], 3);
        let back: DaoProposal = serde_json::from_value(json).unwrap();
        assert_eq!(back, proposal);
        assert!(back.exists());
    }
}
