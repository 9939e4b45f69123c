//! One refresh of a proposal's on-chain state.

use crate::{error::StatusError, settings::ContractAddresses};
use dao_core::{
    address::is_not_zero_address, Address, DaoProposal, ProposalId, VoteTally,
    VotingAdapterName, VotingState,
};
use dao_multicall::{
    contracts::{load_abi, OFFCHAIN_VOTING_ABI},
    decode,
    ethabi::Contract,
    multicall, DaoRegistry, EthCall, Multicall, MulticallError, OffchainVoting, ReturnValues,
};
use ethereum_types::U256;
use std::sync::Arc;
use tracing::debug;

/// What one batched read returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalSnapshot {
    /// Block the reads were executed against.
    pub block_number: U256,
    /// `None` when the registry does not know the proposal.
    pub proposal: Option<DaoProposal>,
    pub voting_adapter: Option<Address>,
    pub tally: Option<VoteTally>,
    pub vote_result: Option<VotingState>,
}

/// Reads the registry and voting adapter state of one proposal.
pub struct ProposalReader<T: ?Sized> {
    transport: Arc<T>,
    multicall: Multicall,
    registry: DaoRegistry,
    voting_abi: Contract,
    voting: Option<OffchainVoting>,
    proposal_id: ProposalId,
}

impl<T: EthCall + ?Sized> ProposalReader<T> {
    pub fn new(
        transport: Arc<T>,
        multicall: Multicall,
        registry: DaoRegistry,
        voting_abi: Contract,
        voting_adapter: Option<Address>,
        proposal_id: ProposalId,
    ) -> Result<Self, StatusError> {
        let voting = voting_adapter
            .map(|address| OffchainVoting::new(address, &voting_abi))
            .transpose()?;
        Ok(ProposalReader {
            transport,
            multicall,
            registry,
            voting_abi,
            voting,
            proposal_id,
        })
    }

    /// A reader over the bundled ABIs.
    pub fn with_bundled_abis(
        transport: Arc<T>,
        contracts: &ContractAddresses,
        proposal_id: ProposalId,
    ) -> Result<Self, StatusError> {
        Self::new(
            transport,
            Multicall::with_bundled_abi(contracts.multicall)?,
            DaoRegistry::with_bundled_abi(contracts.dao_registry)?,
            load_abi(OFFCHAIN_VOTING_ABI)?,
            contracts.voting_adapter,
            proposal_id,
        )
    }

    pub fn proposal_id(&self) -> ProposalId {
        self.proposal_id
    }

    pub fn voting_adapter(&self) -> Option<Address> {
        self.voting.as_ref().map(OffchainVoting::address)
    }

    /// Read the proposal, its tally and its vote result.
    ///
    /// Until the voting adapter is known the registry is asked for the
    /// proposal and its voting adapter first. An adapter that shows up is
    /// checked to be an off-chain voting adapter and kept, and the tally is
    /// read in the same call so a snapshot never reports an adapter without
    /// its tally. Later reads are a single batch.
    pub async fn fetch(&mut self) -> Result<ProposalSnapshot, StatusError> {
        if let Some(voting) = &self.voting {
            return self.read_with_adapter(voting).await;
        }

        let (snapshot, adapter) = self.read_registry().await?;
        let adapter = match adapter {
            Some(adapter) => adapter,
            None => return Ok(snapshot),
        };
        let voting = self.offchain_voting(adapter).await?;
        let snapshot = self.read_with_adapter(&voting).await;
        self.voting = Some(voting);
        snapshot
    }

    async fn read_registry(&self) -> Result<(ProposalSnapshot, Option<Address>), StatusError> {
        let id = self.proposal_id;
        let calls = [self.registry.proposals(id), self.registry.voting_adapter(id)];
        let aggregated = self.multicall.aggregate(&*self.transport, &calls).await?;
        let [proposal, adapter] = into_array(aggregated.results)?;

        let adapter = Some(decode::address(&adapter)?).filter(is_not_zero_address);
        let snapshot = ProposalSnapshot {
            block_number: aggregated.block_number,
            proposal: Some(decode::proposal(&proposal)?).filter(DaoProposal::exists),
            voting_adapter: None,
            tally: None,
            vote_result: None,
        };
        Ok((snapshot, adapter))
    }

    async fn offchain_voting(&self, adapter: Address) -> Result<OffchainVoting, StatusError> {
        let voting = OffchainVoting::new(adapter, &self.voting_abi)?;
        let results = multicall(&*self.transport, &self.multicall, &[voting.adapter_name()]).await?;
        let [name] = into_array(results)?;
        let name = decode::adapter_name(&name)?;

        match name.parse::<VotingAdapterName>() {
            Ok(kind) if kind.is_offchain() => {
                debug!(
                    proposal = ?self.proposal_id,
                    voting_adapter = ?adapter,
                    "voting adapter found"
                );
                Ok(voting)
            }
            _ => Err(StatusError::UnsupportedVotingAdapter {
                address: adapter,
                name,
            }),
        }
    }

    async fn read_with_adapter(
        &self,
        voting: &OffchainVoting,
    ) -> Result<ProposalSnapshot, StatusError> {
        let dao = self.registry.address();
        let id = self.proposal_id;
        let calls = [
            self.registry.proposals(id),
            voting.votes(dao, id),
            voting.vote_result(dao, id),
        ];
        let aggregated = self.multicall.aggregate(&*self.transport, &calls).await?;
        let [proposal, votes, result] = into_array(aggregated.results)?;

        Ok(ProposalSnapshot {
            block_number: aggregated.block_number,
            proposal: Some(decode::proposal(&proposal)?).filter(DaoProposal::exists),
            voting_adapter: Some(voting.address()),
            tally: Some(decode::vote_tally(&votes)?),
            vote_result: Some(decode::vote_result(&result)?),
        })
    }
}

fn into_array<const N: usize>(
    results: Vec<ReturnValues>,
) -> Result<[ReturnValues; N], StatusError> {
    <[_; N]>::try_from(results).map_err(|results| {
        MulticallError::LengthMismatch {
            expected: N,
            actual: results.len(),
        }
        .into()
    })
}
