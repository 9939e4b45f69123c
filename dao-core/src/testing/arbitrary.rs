use crate::{
    address::Address,
    flags::ProposalFlags,
    lifecycle::StageInputs,
    proposal::{DaoProposal, VoteTally, VotingState},
    window::VotingWindow,
};
use ethereum_types::{H256, U256};
use quickcheck::{Arbitrary, Gen};

/// Around May 2021, when the off-chain voting adapters went live.
pub const BASE_TIME: u64 = 1_620_000_000;

impl Arbitrary for ProposalFlags {
    fn arbitrary<G: Gen>(g: &mut G) -> Self {
        ProposalFlags::from_bits(u64::from(u8::arbitrary(g) & 0b111))
    }
}

impl Arbitrary for VotingState {
    fn arbitrary<G: Gen>(g: &mut G) -> Self {
        VotingState::from(u8::arbitrary(g) % 8)
    }
}

impl Arbitrary for DaoProposal {
    fn arbitrary<G: Gen>(g: &mut G) -> Self {
        DaoProposal {
            adapter_address: [u8::arbitrary(g); Address::len_bytes()].into(),
            flags: Arbitrary::arbitrary(g),
        }
    }
}

impl Arbitrary for VoteTally {
    fn arbitrary<G: Gen>(g: &mut G) -> Self {
        let reported = bool::arbitrary(g);
        let reporter = if reported {
            [u8::arbitrary(g) | 1; Address::len_bytes()].into()
        } else {
            Address::zero()
        };
        VoteTally {
            reporter,
            result_root: if reported {
                H256::from([u8::arbitrary(g); 32])
            } else {
                H256::zero()
            },
            nb_yes: U256::from(u32::arbitrary(g)),
            nb_no: U256::from(u32::arbitrary(g)),
            starting_time: BASE_TIME,
            grace_period_starting_time: if reported { BASE_TIME + 600 } else { 0 },
            is_challenged: false,
            index: U256::zero(),
        }
    }
}

/// A window placed near `BASE_TIME`, sometimes missing a bound.
impl Arbitrary for VotingWindow {
    fn arbitrary<G: Gen>(g: &mut G) -> Self {
        let start = BASE_TIME - 500 + u64::from(u16::arbitrary(g) % 1000);
        let end = start + u64::from(u16::arbitrary(g) % 1000);
        VotingWindow {
            start: Option::<()>::arbitrary(g).map(|_| start),
            end: Option::<()>::arbitrary(g).map(|_| end),
        }
    }
}

impl Arbitrary for StageInputs {
    fn arbitrary<G: Gen>(g: &mut G) -> Self {
        StageInputs {
            proposal: Arbitrary::arbitrary(g),
            window: Arbitrary::arbitrary(g),
            tally: Arbitrary::arbitrary(g),
            vote_result: Arbitrary::arbitrary(g),
            now: BASE_TIME - 600 + u64::from(u16::arbitrary(g) % 2400),
        }
    }
}

pub mod pt {
    use super::BASE_TIME;
    use crate::{
        address::Address,
        flags::ProposalFlags,
        lifecycle::StageInputs,
        proposal::{DaoProposal, VoteTally, VotingState},
        window::VotingWindow,
    };
    use proptest::prelude::*;

    pub fn proposal_flags() -> impl Strategy<Value = ProposalFlags> {
        (0u64..8).prop_map(ProposalFlags::from_bits)
    }

    pub fn voting_state() -> impl Strategy<Value = VotingState> {
        (0u8..8).prop_map(VotingState::from)
    }

    pub fn reporter() -> impl Strategy<Value = Address> {
        prop_oneof![
            Just(Address::zero()),
            any::<[u8; 20]>().prop_map(Address::from),
        ]
    }

    prop_compose! {
        pub fn vote_tally()(reporter in reporter(), grace in 0u64..1000) -> VoteTally {
            VoteTally {
                reporter,
                grace_period_starting_time: BASE_TIME + grace,
                ..VoteTally::default()
            }
        }
    }

    prop_compose! {
        /// Inputs whose voting window has not started at `now`.
        pub fn before_window()(
            flags in proptest::option::of(proposal_flags()),
            lead in 1u64..10_000,
            length in 0u64..10_000,
            tally in proptest::option::of(vote_tally()),
            vote_result in proptest::option::of(voting_state()),
        ) -> StageInputs {
            StageInputs {
                proposal: flags.map(|flags| DaoProposal {
                    adapter_address: Address::zero(),
                    flags,
                }),
                window: VotingWindow::new(BASE_TIME + lead, BASE_TIME + lead + length),
                tally,
                vote_result,
                now: BASE_TIME,
            }
        }
    }
}
