use crate::{
    address::Address,
    flags::{ProposalFlag, ProposalFlags},
    lifecycle::StageInputs,
    proposal::{DaoProposal, VoteTally, VotingState},
    window::VotingWindow,
};

/// Builds `StageInputs` for a proposal observed at a fixed instant.
pub struct ProposalBuilder {
    now: u64,
    flags: Option<ProposalFlags>,
    window: VotingWindow,
    tally: Option<VoteTally>,
    vote_result: Option<VotingState>,
}

impl ProposalBuilder {
    pub fn at(now: u64) -> Self {
        ProposalBuilder {
            now,
            flags: None,
            window: VotingWindow::unknown(),
            tally: None,
            vote_result: None,
        }
    }

    pub fn with_flag(mut self, flag: ProposalFlag) -> Self {
        self.flags = Some(self.flags.unwrap_or_default().with(flag));
        self
    }

    pub fn exists(self) -> Self {
        self.with_flag(ProposalFlag::Exists)
    }

    pub fn sponsored(self) -> Self {
        self.exists().with_flag(ProposalFlag::Sponsored)
    }

    pub fn processed(self) -> Self {
        self.with_flag(ProposalFlag::Processed)
    }

    pub fn window_upcoming(mut self) -> Self {
        self.window = VotingWindow::new(self.now + 3600, self.now + 7200);
        self
    }

    pub fn window_open(mut self) -> Self {
        self.window = VotingWindow::new(self.now - 3600, self.now + 3600);
        self
    }

    pub fn window_ended(mut self) -> Self {
        self.window = VotingWindow::new(self.now - 7200, self.now - 3600);
        self
    }

    pub fn reported_by(mut self, reporter: Address) -> Self {
        let mut tally = self.tally.take().unwrap_or_default();
        tally.reporter = reporter;
        tally.grace_period_starting_time = self.now - 60;
        self.tally = Some(tally);
        self
    }

    pub fn vote_result(mut self, result: VotingState) -> Self {
        self.vote_result = Some(result);
        self
    }

    pub fn build(self) -> StageInputs {
        StageInputs {
            proposal: self.flags.map(|flags| DaoProposal {
                adapter_address: Address::zero(),
                flags,
            }),
            window: self.window,
            tally: self.tally,
            vote_result: self.vote_result,
            now: self.now,
        }
    }
}
