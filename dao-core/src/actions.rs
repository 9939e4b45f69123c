//! What a client can offer the user for a proposal in a given stage.
//!
//! The actions themselves (signing and sending transactions) live with the
//! host application; this only decides which ones apply.

use crate::{
    adapters::AdapterName,
    lifecycle::LifecycleStage,
    proposal::{VoteTally, VotingState},
};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ProposalAction {
    Submit,
    Sponsor,
    Vote,
    SubmitVoteResult,
    Process,
    /// Processing a tribute needs to know the outcome up front.
    ProcessTribute { passed: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionPlan {
    pub show_voting_status: bool,
    pub primary: Option<ProposalAction>,
    /// The primary action is shown but cannot be triggered yet.
    pub primary_disabled: bool,
    pub post_process: bool,
    /// Start of the grace period countdown in milliseconds, zero outside of
    /// the grace period.
    pub grace_period_start_ms: u64,
}

impl ActionPlan {
    pub fn for_stage(
        adapter: AdapterName,
        stage: LifecycleStage,
        tally: Option<&VoteTally>,
        vote_result: Option<VotingState>,
    ) -> Self {
        let passed = vote_result == Some(VotingState::Pass);

        let primary = match stage {
            LifecycleStage::Submit => Some(ProposalAction::Submit),
            LifecycleStage::Sponsor => Some(ProposalAction::Sponsor),
            LifecycleStage::VotingOpen => Some(ProposalAction::Vote),
            LifecycleStage::AwaitingResultSubmission => Some(ProposalAction::SubmitVoteResult),
            LifecycleStage::GracePeriod | LifecycleStage::ReadyToProcess => match adapter {
                AdapterName::Tribute => Some(ProposalAction::ProcessTribute { passed }),
                _ => Some(ProposalAction::Process),
            },
            LifecycleStage::Completed | LifecycleStage::Unknown => None,
        };

        let grace_period_start_ms = match (stage, tally) {
            (LifecycleStage::GracePeriod, Some(tally)) => tally.grace_period_start_ms(),
            _ => 0,
        };

        ActionPlan {
            show_voting_status: matches!(
                stage,
                LifecycleStage::VotingOpen
                    | LifecycleStage::AwaitingResultSubmission
                    | LifecycleStage::GracePeriod
                    | LifecycleStage::ReadyToProcess
                    | LifecycleStage::Completed
            ),
            primary,
            primary_disabled: stage == LifecycleStage::GracePeriod,
            post_process: adapter == AdapterName::Distribute
                && stage == LifecycleStage::Completed
                && passed,
            grace_period_start_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn process_is_disabled_during_grace_period() {
        let tally = VoteTally {
            grace_period_starting_time: 1_700_000_000,
            ..VoteTally::default()
        };
        let plan = ActionPlan::for_stage(
            AdapterName::Onboarding,
            LifecycleStage::GracePeriod,
            Some(&tally),
            Some(VotingState::GracePeriod),
        );
        assert_eq!(plan.primary, Some(ProposalAction::Process));
        assert!(plan.primary_disabled);
        assert!(plan.show_voting_status);
        assert_eq!(plan.grace_period_start_ms, 1_700_000_000_000);

        let plan = ActionPlan::for_stage(
            AdapterName::Onboarding,
            LifecycleStage::ReadyToProcess,
            Some(&tally),
            Some(VotingState::Pass),
        );
        assert!(!plan.primary_disabled);
        assert_eq!(plan.grace_period_start_ms, 0);
    }

    #[test]
    fn tribute_process_carries_outcome() {
        let plan = ActionPlan::for_stage(
            AdapterName::Tribute,
            LifecycleStage::ReadyToProcess,
            None,
            Some(VotingState::NotPass),
        );
        assert_eq!(
            plan.primary,
            Some(ProposalAction::ProcessTribute { passed: false })
        );
    }

    #[test]
    fn post_process_only_for_passed_distribute() {
        let passed = ActionPlan::for_stage(
            AdapterName::Distribute,
            LifecycleStage::Completed,
            None,
            Some(VotingState::Pass),
        );
        assert!(passed.post_process);
        assert_eq!(passed.primary, None);

        let failed = ActionPlan::for_stage(
            AdapterName::Distribute,
            LifecycleStage::Completed,
            None,
            Some(VotingState::NotPass),
        );
        assert!(!failed.post_process);

        let other = ActionPlan::for_stage(
            AdapterName::Financing,
            LifecycleStage::Completed,
            None,
            Some(VotingState::Pass),
        );
        assert!(!other.post_process);
    }

    #[test]
    fn status_panel_hidden_before_voting() {
        for stage in LifecycleStage::iter() {
            let plan = ActionPlan::for_stage(AdapterName::Financing, stage, None, None);
            let expected = !matches!(
                stage,
                LifecycleStage::Submit | LifecycleStage::Sponsor | LifecycleStage::Unknown
            );
            assert_eq!(plan.show_voting_status, expected, "{}", stage);
        }
    }
}
