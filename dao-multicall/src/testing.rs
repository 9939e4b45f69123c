//! An in-memory Multicall contract for tests.

use crate::{
    error::TransportError,
    multicall::{Call, Multicall},
    transport::EthCall,
};
use async_trait::async_trait;
use dao_core::{Address, VotingAdapterName, VotingState};
use ethabi::{Function, Token};
use ethereum_types::{H256, U256};
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

/// Answers aggregate calls from canned per-call responses.
///
/// A call without a canned response reverts, which fails the whole batch
/// like the real aggregate does.
pub struct MockChain {
    multicall: Address,
    aggregate: Function,
    responses: Mutex<HashMap<(Address, Vec<u8>), Vec<u8>>>,
    failure: Mutex<Option<String>>,
    requests: AtomicUsize,
}

impl MockChain {
    pub fn new(multicall: &Multicall) -> Self {
        MockChain {
            multicall: multicall.address(),
            aggregate: multicall.aggregate_function().clone(),
            responses: Mutex::new(HashMap::new()),
            failure: Mutex::new(None),
            requests: AtomicUsize::new(0),
        }
    }

    /// Answer `call` with `outputs` from now on.
    pub fn respond(&self, call: &Call<'_>, outputs: &[Token]) {
        let calldata = call
            .function
            .encode_input(&call.args)
            .expect("call arguments match the ABI");
        self.responses
            .lock()
            .unwrap()
            .insert((call.target, calldata), ethabi::encode(outputs));
    }

    /// Make every following request fail at the transport level.
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_owned());
    }

    pub fn recover(&self) {
        *self.failure.lock().unwrap() = None;
    }

    /// Number of `eth_call` requests received so far.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn answer(&self, to: Address, data: &[u8]) -> Result<Vec<u8>, TransportError> {
        if to != self.multicall {
            return Err(TransportError::new(format!("no contract at {:?}", to)));
        }
        if data.len() < 4 || data[..4] != self.aggregate.short_signature() {
            return Err(TransportError::new("execution reverted: unknown selector"));
        }
        let calls = self
            .aggregate
            .decode_input(&data[4..])
            .map_err(TransportError::new)?
            .into_iter()
            .next()
            .and_then(Token::into_array)
            .ok_or_else(|| TransportError::new("execution reverted: malformed calls"))?;

        let responses = self.responses.lock().unwrap();
        let mut return_data = Vec::with_capacity(calls.len());
        for call in calls {
            let mut parts = call.into_tuple().unwrap_or_default().into_iter();
            let key = match (parts.next(), parts.next()) {
                (Some(Token::Address(target)), Some(Token::Bytes(calldata))) => (target, calldata),
                _ => return Err(TransportError::new("execution reverted: malformed call")),
            };
            let output = responses.get(&key).ok_or_else(|| {
                TransportError::new(format!("execution reverted: call to {:?}", key.0))
            })?;
            return_data.push(Token::Bytes(output.clone()));
        }

        Ok(ethabi::encode(&[
            Token::Uint(U256::from(self.requests() as u64)),
            Token::Array(return_data),
        ]))
    }
}

#[async_trait]
impl EthCall for MockChain {
    async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(TransportError::new(message));
        }
        self.answer(to, &data)
    }
}

/// `proposals(bytes32)` outputs.
pub fn proposal_outputs(adapter: Address, flags: u64) -> Vec<Token> {
    vec![Token::Address(adapter), Token::Uint(U256::from(flags))]
}

/// `votes(address,bytes32)` outputs for a tally reported by `reporter`
/// (the zero address for none) with the given grace period start.
pub fn votes_outputs(reporter: Address, grace_period_starting_time: u64) -> Vec<Token> {
    let result_root = if reporter.is_zero() {
        H256::zero()
    } else {
        H256::repeat_byte(0x5e)
    };
    vec![
        // snapshot
        Token::Uint(U256::from(12_000_000u64)),
        // proposalHash
        Token::FixedBytes(H256::repeat_byte(0x01).as_bytes().to_vec()),
        Token::Address(reporter),
        Token::FixedBytes(result_root.as_bytes().to_vec()),
        // nbYes, nbNo
        Token::Uint(U256::from(7u64)),
        Token::Uint(U256::from(2u64)),
        // index
        Token::Uint(U256::zero()),
        // startingTime
        Token::Uint(U256::from(1_600_000_000u64)),
        Token::Uint(U256::from(grace_period_starting_time)),
        // isChallenged
        Token::Bool(false),
        // stepRequested
        Token::Uint(U256::zero()),
        // forceFailed
        Token::Bool(false),
        // fallbackVotesCount
        Token::Uint(U256::zero()),
    ]
}

/// `voteResult(address,bytes32)` outputs.
pub fn vote_result_outputs(state: VotingState) -> Vec<Token> {
    vec![Token::Uint(U256::from(state.code()))]
}

/// `getAdapterName()` outputs.
pub fn adapter_name_outputs(name: VotingAdapterName) -> Vec<Token> {
    vec![Token::String(name.as_ref().to_owned())]
}

/// `votingAdapter(bytes32)` or `adapters(bytes32)` outputs.
pub fn address_outputs(address: Address) -> Vec<Token> {
    vec![Token::Address(address)]
}
