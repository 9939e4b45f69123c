//! Reading decoded call outputs into domain types.
//!
//! Outputs are looked up by their ABI name so that adapter versions which
//! add or reorder fields in `votes` still decode.

use crate::{error::DecodeError, multicall::ReturnValues};
use dao_core::{Address, DaoProposal, VoteTally, VotingState};
use ethabi::Token;
use ethereum_types::{H256, U256};

fn named<'a>(values: &'a ReturnValues, name: &'static str) -> Result<&'a Token, DecodeError> {
    values.get(name).ok_or(DecodeError::MissingOutput(name))
}

fn as_address(token: &Token, name: &'static str) -> Result<Address, DecodeError> {
    match token {
        Token::Address(address) => Ok(*address),
        _ => Err(DecodeError::UnexpectedType {
            name,
            expected: "address",
        }),
    }
}

fn as_uint(token: &Token, name: &'static str) -> Result<U256, DecodeError> {
    match token {
        Token::Uint(value) => Ok(*value),
        _ => Err(DecodeError::UnexpectedType {
            name,
            expected: "uint256",
        }),
    }
}

fn as_bytes32(token: &Token, name: &'static str) -> Result<H256, DecodeError> {
    match token {
        Token::FixedBytes(bytes) if bytes.len() == 32 => Ok(H256::from_slice(bytes)),
        _ => Err(DecodeError::UnexpectedType {
            name,
            expected: "bytes32",
        }),
    }
}

fn as_bool(token: &Token, name: &'static str) -> Result<bool, DecodeError> {
    match token {
        Token::Bool(value) => Ok(*value),
        _ => Err(DecodeError::UnexpectedType {
            name,
            expected: "bool",
        }),
    }
}

/// Timestamps are `uint256` on chain; anything past `u64` saturates.
fn seconds(value: U256) -> u64 {
    if value > U256::from(u64::MAX) {
        u64::MAX
    } else {
        value.low_u64()
    }
}

fn optional<T>(
    values: &ReturnValues,
    name: &'static str,
    read: fn(&Token, &'static str) -> Result<T, DecodeError>,
) -> Result<Option<T>, DecodeError> {
    values.get(name).map(|token| read(token, name)).transpose()
}

/// Output of `DaoRegistry.proposals(bytes32)`.
pub fn proposal(values: &ReturnValues) -> Result<DaoProposal, DecodeError> {
    Ok(DaoProposal {
        adapter_address: as_address(named(values, "adapterAddress")?, "adapterAddress")?,
        flags: as_uint(named(values, "flags")?, "flags")?.into(),
    })
}

/// Output of an off-chain voting adapter's `votes(address,bytes32)`.
///
/// `reporter`, `resultRoot` and `gracePeriodStartingTime` are required,
/// the other fields default to zero when the adapter does not expose them.
pub fn vote_tally(values: &ReturnValues) -> Result<VoteTally, DecodeError> {
    Ok(VoteTally {
        reporter: as_address(named(values, "reporter")?, "reporter")?,
        result_root: as_bytes32(named(values, "resultRoot")?, "resultRoot")?,
        nb_yes: optional(values, "nbYes", as_uint)?.unwrap_or_default(),
        nb_no: optional(values, "nbNo", as_uint)?.unwrap_or_default(),
        starting_time: optional(values, "startingTime", as_uint)?
            .map(seconds)
            .unwrap_or(0),
        grace_period_starting_time: seconds(as_uint(
            named(values, "gracePeriodStartingTime")?,
            "gracePeriodStartingTime",
        )?),
        is_challenged: optional(values, "isChallenged", as_bool)?.unwrap_or(false),
        index: optional(values, "index", as_uint)?.unwrap_or_default(),
    })
}

/// Output of `voteResult(address,bytes32)`: a single `uint8` enum value.
pub fn vote_result(values: &ReturnValues) -> Result<VotingState, DecodeError> {
    let code = values
        .first()
        .ok_or(DecodeError::MissingOutput("state"))
        .and_then(|token| as_uint(token, "state"))?;
    if code > U256::from(u8::MAX) {
        return Err(DecodeError::VoteResultOutOfRange(code.to_string()));
    }
    Ok(VotingState::from(code.low_u64() as u8))
}

/// Output of `getAdapterName()`.
pub fn adapter_name(values: &ReturnValues) -> Result<String, DecodeError> {
    match values.first() {
        Some(Token::String(name)) => Ok(name.clone()),
        Some(_) => Err(DecodeError::UnexpectedType {
            name: "adapterName",
            expected: "string",
        }),
        None => Err(DecodeError::MissingOutput("adapterName")),
    }
}

/// Output of a getter returning a lone `address`.
pub fn address(values: &ReturnValues) -> Result<Address, DecodeError> {
    values
        .first()
        .ok_or(DecodeError::MissingOutput("address"))
        .and_then(|token| as_address(token, "address"))
}
