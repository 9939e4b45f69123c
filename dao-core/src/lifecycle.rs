//! # Proposal lifecycle
//!
//! Maps what is known about a proposal (registry flags, voting window,
//! voting adapter tally and result) to the single [`LifecycleStage`] it is
//! in. The mapping is total: inputs that fit no stage give
//! [`LifecycleStage::Unknown`].
//!
//! Guards are evaluated in a fixed order and the first one that holds wins:
//!
//! 1. processed in the registry: `Completed`, whatever else is known;
//! 2. window not started, proposal absent: `Submit`;
//! 3. window not started, proposal present: `Sponsor`;
//! 4. window open, sponsored: `VotingOpen`;
//! 5. window ended, sponsored, no result: `AwaitingResultSubmission`;
//! 6. window ended, sponsored, result in grace period: `GracePeriod`;
//! 7. window ended, sponsored, any other result: `ReadyToProcess`.

use crate::{
    proposal::{DaoProposal, VoteTally, VotingState},
    window::{VotingWindow, WindowTiming},
};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumCount, EnumIter};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumCount,
)]
pub enum LifecycleStage {
    Submit,
    Sponsor,
    VotingOpen,
    AwaitingResultSubmission,
    GracePeriod,
    ReadyToProcess,
    Completed,
    Unknown,
}

impl LifecycleStage {
    /// No further on-chain transition can happen from this stage.
    pub fn is_final(self) -> bool {
        matches!(self, LifecycleStage::Completed)
    }
}

/// Everything the deriver looks at, captured at one instant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageInputs {
    /// `None` until the registry was read.
    pub proposal: Option<DaoProposal>,
    pub window: VotingWindow,
    pub tally: Option<VoteTally>,
    pub vote_result: Option<VotingState>,
    /// Seconds since the unix epoch.
    pub now: u64,
}

impl StageInputs {
    fn result_submitted(&self) -> bool {
        self.tally
            .as_ref()
            .map(VoteTally::result_submitted)
            .unwrap_or(false)
    }
}

/// Derives lifecycle stages for one family of voting adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusDeriver {
    grace_period: VotingState,
}

impl StatusDeriver {
    /// `grace_period` is the result code the voting adapter reports while a
    /// submitted result can still be challenged.
    pub fn new(grace_period: VotingState) -> Self {
        StatusDeriver { grace_period }
    }

    pub fn grace_period(&self) -> VotingState {
        self.grace_period
    }

    pub fn derive(&self, inputs: &StageInputs) -> LifecycleStage {
        let flags = inputs.proposal.map(|p| p.flags).unwrap_or_default();

        if flags.processed() {
            return LifecycleStage::Completed;
        }

        match inputs.window.timing(inputs.now) {
            WindowTiming::NotStarted if !flags.exists() => LifecycleStage::Submit,
            WindowTiming::NotStarted => LifecycleStage::Sponsor,
            WindowTiming::Open if flags.sponsored() => LifecycleStage::VotingOpen,
            WindowTiming::Ended if flags.sponsored() => {
                if !inputs.result_submitted() {
                    LifecycleStage::AwaitingResultSubmission
                } else if inputs.vote_result == Some(self.grace_period) {
                    LifecycleStage::GracePeriod
                } else {
                    LifecycleStage::ReadyToProcess
                }
            }
            WindowTiming::Open | WindowTiming::Ended | WindowTiming::Unknown => {
                LifecycleStage::Unknown
            }
        }
    }
}

impl Default for StatusDeriver {
    fn default() -> Self {
        StatusDeriver::new(VotingState::GracePeriod)
    }
}

/// Derive with the default grace period code.
pub fn derive_stage(inputs: &StageInputs) -> LifecycleStage {
    StatusDeriver::default().derive(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        address::{parse_address, Address},
        flags::{ProposalFlag, ProposalFlags},
    };
    use quickcheck_macros::quickcheck;
    use std::collections::HashSet;
    use strum::{EnumCount, IntoEnumIterator};

    const NOW: u64 = 1_650_000_000;

    fn proposal(flags: &[ProposalFlag]) -> Option<DaoProposal> {
        let flags = flags
            .iter()
            .fold(ProposalFlags::empty(), |acc, flag| acc.with(*flag));
        Some(DaoProposal {
            adapter_address: Address::zero(),
            flags,
        })
    }

    fn future_window() -> VotingWindow {
        VotingWindow::new(NOW + 60, NOW + 120)
    }

    fn open_window() -> VotingWindow {
        VotingWindow::new(NOW - 60, NOW + 60)
    }

    fn past_window() -> VotingWindow {
        VotingWindow::new(NOW - 120, NOW - 60)
    }

    fn reported_tally() -> Option<VoteTally> {
        Some(VoteTally {
            reporter: parse_address("0x2d6a1f5e0b3cc4ce3f0e6f5a7b8c9d0e1f2a3b4c").unwrap(),
            grace_period_starting_time: NOW - 30,
            ..VoteTally::default()
        })
    }

    #[test]
    fn eight_distinct_stages() {
        let stages: HashSet<_> = LifecycleStage::iter().collect();
        assert_eq!(stages.len(), 8);
        assert_eq!(LifecycleStage::COUNT, 8);
    }

    #[test]
    fn absent_proposal_before_window_is_submit() {
        let inputs = StageInputs {
            proposal: None,
            window: future_window(),
            now: NOW,
            ..StageInputs::default()
        };
        assert_eq!(derive_stage(&inputs), LifecycleStage::Submit);

        let zeroed = StageInputs {
            proposal: proposal(&[]),
            ..inputs
        };
        assert_eq!(derive_stage(&zeroed), LifecycleStage::Submit);
    }

    #[test]
    fn existing_unsponsored_before_window_is_sponsor() {
        let inputs = StageInputs {
            proposal: proposal(&[ProposalFlag::Exists]),
            window: future_window(),
            now: NOW,
            ..StageInputs::default()
        };
        assert_eq!(derive_stage(&inputs), LifecycleStage::Sponsor);
    }

    #[test]
    fn sponsored_in_window_is_voting_open() {
        let inputs = StageInputs {
            proposal: proposal(&[ProposalFlag::Exists, ProposalFlag::Sponsored]),
            window: open_window(),
            now: NOW,
            ..StageInputs::default()
        };
        assert_eq!(derive_stage(&inputs), LifecycleStage::VotingOpen);
    }

    #[test]
    fn unsponsored_in_window_is_unknown() {
        let inputs = StageInputs {
            proposal: proposal(&[ProposalFlag::Exists]),
            window: open_window(),
            now: NOW,
            ..StageInputs::default()
        };
        assert_eq!(derive_stage(&inputs), LifecycleStage::Unknown);
    }

    #[test]
    fn ended_without_reporter_awaits_result() {
        let inputs = StageInputs {
            proposal: proposal(&[ProposalFlag::Exists, ProposalFlag::Sponsored]),
            window: past_window(),
            tally: Some(VoteTally::default()),
            vote_result: Some(VotingState::NotStarted),
            now: NOW,
        };
        assert_eq!(derive_stage(&inputs), LifecycleStage::AwaitingResultSubmission);

        let no_tally = StageInputs {
            tally: None,
            ..inputs
        };
        assert_eq!(derive_stage(&no_tally), LifecycleStage::AwaitingResultSubmission);
    }

    #[test]
    fn reported_result_in_grace_period() {
        let inputs = StageInputs {
            proposal: proposal(&[ProposalFlag::Exists, ProposalFlag::Sponsored]),
            window: past_window(),
            tally: reported_tally(),
            vote_result: Some(VotingState::GracePeriod),
            now: NOW,
        };
        assert_eq!(derive_stage(&inputs), LifecycleStage::GracePeriod);
    }

    #[test]
    fn reported_result_after_grace_period_is_ready() {
        for result in [VotingState::Pass, VotingState::NotPass, VotingState::Tie] {
            let inputs = StageInputs {
                proposal: proposal(&[ProposalFlag::Exists, ProposalFlag::Sponsored]),
                window: past_window(),
                tally: reported_tally(),
                vote_result: Some(result),
                now: NOW,
            };
            assert_eq!(derive_stage(&inputs), LifecycleStage::ReadyToProcess);
        }
    }

    #[test]
    fn missing_result_code_counts_as_not_in_grace() {
        let inputs = StageInputs {
            proposal: proposal(&[ProposalFlag::Exists, ProposalFlag::Sponsored]),
            window: past_window(),
            tally: reported_tally(),
            vote_result: None,
            now: NOW,
        };
        assert_eq!(derive_stage(&inputs), LifecycleStage::ReadyToProcess);
    }

    #[test]
    fn processed_wins_over_everything() {
        for window in [
            VotingWindow::unknown(),
            future_window(),
            open_window(),
            past_window(),
        ] {
            let inputs = StageInputs {
                proposal: proposal(&[
                    ProposalFlag::Exists,
                    ProposalFlag::Sponsored,
                    ProposalFlag::Processed,
                ]),
                window,
                tally: reported_tally(),
                vote_result: Some(VotingState::GracePeriod),
                now: NOW,
            };
            assert_eq!(derive_stage(&inputs), LifecycleStage::Completed);
        }
    }

    #[test]
    fn unknown_window_without_processed_is_unknown() {
        let inputs = StageInputs {
            proposal: proposal(&[ProposalFlag::Exists, ProposalFlag::Sponsored]),
            window: VotingWindow::unknown(),
            tally: reported_tally(),
            vote_result: Some(VotingState::Pass),
            now: NOW,
        };
        assert_eq!(derive_stage(&inputs), LifecycleStage::Unknown);
    }

    #[test]
    fn custom_grace_period_code() {
        let deriver = StatusDeriver::new(VotingState::Other(9));
        let inputs = StageInputs {
            proposal: proposal(&[ProposalFlag::Exists, ProposalFlag::Sponsored]),
            window: past_window(),
            tally: reported_tally(),
            vote_result: Some(VotingState::Other(9)),
            now: NOW,
        };
        assert_eq!(deriver.derive(&inputs), LifecycleStage::GracePeriod);
        assert_eq!(derive_stage(&inputs), LifecycleStage::ReadyToProcess);
    }

    #[quickcheck]
    fn processed_is_always_completed(inputs: StageInputs) -> bool {
        let processed = inputs.proposal.map(|p| p.flags.processed()).unwrap_or(false);
        !processed || derive_stage(&inputs) == LifecycleStage::Completed
    }

    #[quickcheck]
    fn derivation_is_deterministic(inputs: StageInputs) -> bool {
        derive_stage(&inputs) == derive_stage(&inputs.clone())
    }

    #[quickcheck]
    fn completed_only_when_processed(inputs: StageInputs) -> bool {
        let processed = inputs.proposal.map(|p| p.flags.processed()).unwrap_or(false);
        (derive_stage(&inputs) == LifecycleStage::Completed) == processed
    }

    #[quickcheck]
    fn voting_stages_need_sponsorship(inputs: StageInputs) -> bool {
        let sponsored = inputs.proposal.map(|p| p.flags.sponsored()).unwrap_or(false);
        match derive_stage(&inputs) {
            LifecycleStage::VotingOpen
            | LifecycleStage::AwaitingResultSubmission
            | LifecycleStage::GracePeriod
            | LifecycleStage::ReadyToProcess => sponsored,
            _ => true,
        }
    }

    proptest::proptest! {
        #[test]
        fn not_started_is_submit_or_sponsor(inputs in crate::testing::pt::before_window()) {
            let exists = inputs.proposal.map(|p| p.flags.exists()).unwrap_or(false);
            let processed = inputs.proposal.map(|p| p.flags.processed()).unwrap_or(false);
            let expected = match (processed, exists) {
                (true, _) => LifecycleStage::Completed,
                (false, false) => LifecycleStage::Submit,
                (false, true) => LifecycleStage::Sponsor,
            };
            proptest::prop_assert_eq!(derive_stage(&inputs), expected);
        }
    }

    #[test]
    fn builder_scenarios() {
        use crate::testing::ProposalBuilder;

        let reporter = parse_address("0x9c1f00000000000000000000000000000000beef").unwrap();
        let cases = vec![
            (ProposalBuilder::at(NOW).window_upcoming(), LifecycleStage::Submit),
            (ProposalBuilder::at(NOW).exists().window_upcoming(), LifecycleStage::Sponsor),
            (ProposalBuilder::at(NOW).sponsored().window_open(), LifecycleStage::VotingOpen),
            (
                ProposalBuilder::at(NOW).sponsored().window_ended(),
                LifecycleStage::AwaitingResultSubmission,
            ),
            (
                ProposalBuilder::at(NOW)
                    .sponsored()
                    .window_ended()
                    .reported_by(reporter)
                    .vote_result(VotingState::GracePeriod),
                LifecycleStage::GracePeriod,
            ),
            (
                ProposalBuilder::at(NOW)
                    .sponsored()
                    .window_ended()
                    .reported_by(reporter)
                    .vote_result(VotingState::Pass),
                LifecycleStage::ReadyToProcess,
            ),
            (ProposalBuilder::at(NOW).processed(), LifecycleStage::Completed),
            (ProposalBuilder::at(NOW), LifecycleStage::Unknown),
        ];
        for (builder, expected) in cases {
            assert_eq!(derive_stage(&builder.build()), expected);
        }
    }
}
