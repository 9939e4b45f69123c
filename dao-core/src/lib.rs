pub mod actions;
pub mod adapters;
pub mod address;
pub mod flags;
pub mod lifecycle;
pub mod proposal;
pub mod window;

#[cfg(any(test, feature = "property-test-api"))]
pub mod testing;

pub use crate::{
    actions::{ActionPlan, ProposalAction},
    adapters::{AdapterName, VotingAdapterName},
    address::{Address, BURN_ADDRESS},
    flags::{ProposalFlag, ProposalFlags},
    lifecycle::{derive_stage, LifecycleStage, StageInputs, StatusDeriver},
    proposal::{DaoProposal, ProposalId, VoteTally, VotingState},
    window::{Clock, FixedClock, SystemClock, VotingWindow},
};
