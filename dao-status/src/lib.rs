//! Keeps a DAO proposal's lifecycle stage in sync with the chain.
//!
//! A [`ProposalReader`] fetches the proposal, its voting adapter tally and
//! vote result in one multicall. A [`StatusPoller`] repeats that read on an
//! interval and publishes the derived [`LifecycleStage`](dao_core::LifecycleStage)
//! to subscribers until the proposal is processed.

pub mod error;
pub mod poller;
pub mod reader;
pub mod settings;

pub use crate::{
    error::{SettingsError, StatusError},
    poller::{PollState, PollerHandle, StatusPoller},
    reader::{ProposalReader, ProposalSnapshot},
    settings::{ContractAddresses, PollerSettings, Settings, DEFAULT_POLL_INTERVAL_MS},
};
