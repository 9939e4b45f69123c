//! The contracts the client reads from, with the subset of their ABI it
//! needs bundled in `abi/`.

use crate::{error::MulticallError, multicall::Call};
use dao_core::{Address, ProposalId};
use ethabi::{Contract, Function, Token};
use ethereum_types::H256;

pub const DAO_REGISTRY_ABI: &[u8] = include_bytes!("../abi/DaoRegistry.json");
pub const OFFCHAIN_VOTING_ABI: &[u8] = include_bytes!("../abi/OffchainVotingContract.json");
pub const MULTICALL_ABI: &[u8] = include_bytes!("../abi/Multicall.json");

pub fn load_abi(json: &[u8]) -> Result<Contract, MulticallError> {
    Contract::load(json).map_err(MulticallError::Abi)
}

pub(crate) fn function(abi: &Contract, name: &str) -> Result<Function, MulticallError> {
    abi.function(name)
        .map(Clone::clone)
        .map_err(|_| MulticallError::MissingFunction(name.to_owned()))
}

fn bytes32(value: H256) -> Token {
    Token::FixedBytes(value.as_bytes().to_vec())
}

/// The DAO registry: proposals, their voting adapters and the adapter table.
#[derive(Debug, Clone)]
pub struct DaoRegistry {
    address: Address,
    proposals: Function,
    voting_adapter: Function,
    adapters: Function,
}

impl DaoRegistry {
    pub fn new(address: Address, abi: &Contract) -> Result<Self, MulticallError> {
        Ok(DaoRegistry {
            address,
            proposals: function(abi, "proposals")?,
            voting_adapter: function(abi, "votingAdapter")?,
            adapters: function(abi, "adapters")?,
        })
    }

    pub fn with_bundled_abi(address: Address) -> Result<Self, MulticallError> {
        Self::new(address, &load_abi(DAO_REGISTRY_ABI)?)
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// `proposals(bytes32) returns (address adapterAddress, uint256 flags)`
    pub fn proposals(&self, id: ProposalId) -> Call<'_> {
        Call::new(self.address, &self.proposals, vec![bytes32(id)])
    }

    /// `votingAdapter(bytes32) returns (address)`, zero until sponsored.
    pub fn voting_adapter(&self, id: ProposalId) -> Call<'_> {
        Call::new(self.address, &self.voting_adapter, vec![bytes32(id)])
    }

    /// `adapters(bytes32) returns (address)`, zero for unregistered ids.
    pub fn adapter(&self, adapter_id: H256) -> Call<'_> {
        Call::new(self.address, &self.adapters, vec![bytes32(adapter_id)])
    }
}

/// An off-chain voting adapter.
#[derive(Debug, Clone)]
pub struct OffchainVoting {
    address: Address,
    votes: Function,
    vote_result: Function,
    adapter_name: Function,
}

impl OffchainVoting {
    pub fn new(address: Address, abi: &Contract) -> Result<Self, MulticallError> {
        Ok(OffchainVoting {
            address,
            votes: function(abi, "votes")?,
            vote_result: function(abi, "voteResult")?,
            adapter_name: function(abi, "getAdapterName")?,
        })
    }

    pub fn with_bundled_abi(address: Address) -> Result<Self, MulticallError> {
        Self::new(address, &load_abi(OFFCHAIN_VOTING_ABI)?)
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// `votes(address dao, bytes32 proposalId)`, the per proposal tally.
    pub fn votes(&self, dao: Address, id: ProposalId) -> Call<'_> {
        Call::new(
            self.address,
            &self.votes,
            vec![Token::Address(dao), bytes32(id)],
        )
    }

    /// `voteResult(address dao, bytes32 proposalId) returns (uint8)`
    pub fn vote_result(&self, dao: Address, id: ProposalId) -> Call<'_> {
        Call::new(
            self.address,
            &self.vote_result,
            vec![Token::Address(dao), bytes32(id)],
        )
    }

    /// `getAdapterName() returns (string)`, the contract's `ADAPTER_NAME`.
    pub fn adapter_name(&self) -> Call<'_> {
        Call::new(self.address, &self.adapter_name, Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_abis_load() {
        let registry = DaoRegistry::with_bundled_abi(Address::zero()).unwrap();
        let voting = OffchainVoting::with_bundled_abi(Address::zero()).unwrap();
        assert_eq!(registry.proposals.outputs.len(), 2);
        assert_eq!(voting.vote_result.outputs.len(), 1);
        assert!(voting.adapter_name().args.is_empty());
        assert!(voting.votes.outputs.iter().any(|p| p.name == "reporter"));
    }

    #[test]
    fn missing_function_is_named() {
        let voting_abi = load_abi(OFFCHAIN_VOTING_ABI).unwrap();
        let err = DaoRegistry::new(Address::zero(), &voting_abi).unwrap_err();
        assert!(matches!(err, MulticallError::MissingFunction(name) if name == "proposals"));
    }

    #[test]
    fn calldata_starts_with_the_selector() {
        let registry = DaoRegistry::with_bundled_abi(Address::zero()).unwrap();
        let call = registry.proposals(ProposalId::from([7u8; 32]));
        let data = call.function.encode_input(&call.args).unwrap();
        assert_eq!(data.len(), 4 + 32);
        assert_eq!(data[..4], call.function.short_signature());
        assert_eq!(&data[4..], &[7u8; 32][..]);
    }
}
