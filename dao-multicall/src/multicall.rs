//! # Batched reads
//!
//! Bundles several read-only contract calls into one `eth_call` against a
//! Multicall contract's `aggregate((address,bytes)[])`. Results come back in
//! the order the calls were given.

use crate::{
    contracts::{function, load_abi, MULTICALL_ABI},
    error::MulticallError,
    transport::EthCall,
};
use dao_core::Address;
use ethabi::{Contract, Function, Token};
use ethereum_types::U256;
use tracing::debug;

/// One contract read: the target, the function's ABI and its arguments.
#[derive(Debug, Clone)]
pub struct Call<'a> {
    pub target: Address,
    pub function: &'a Function,
    pub args: Vec<Token>,
}

impl<'a> Call<'a> {
    pub fn new(target: Address, function: &'a Function, args: Vec<Token>) -> Self {
        Call {
            target,
            function,
            args,
        }
    }

    fn encode(&self) -> Result<Vec<u8>, MulticallError> {
        self.function
            .encode_input(&self.args)
            .map_err(|source| MulticallError::Encode {
                target: self.target,
                function: self.function.name.clone(),
                source,
            })
    }
}

/// Decoded outputs of one call, keyed by the ABI output names.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnValues {
    outputs: Vec<(String, Token)>,
}

impl ReturnValues {
    pub fn new(function: &Function, tokens: Vec<Token>) -> Self {
        let outputs = function
            .outputs
            .iter()
            .map(|param| param.name.clone())
            .zip(tokens)
            .collect();
        ReturnValues { outputs }
    }

    /// The output named `name`. Unnamed outputs can only be reached by
    /// position.
    pub fn get(&self, name: &str) -> Option<&Token> {
        self.outputs
            .iter()
            .find(|(output, _)| !output.is_empty() && output == name)
            .map(|(_, token)| token)
    }

    pub fn first(&self) -> Option<&Token> {
        self.outputs.first().map(|(_, token)| token)
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.outputs.iter().map(|(_, token)| token)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Aggregated {
    /// Block the reads were executed against.
    pub block_number: U256,
    pub results: Vec<ReturnValues>,
}

/// A deployed Multicall contract.
#[derive(Debug, Clone)]
pub struct Multicall {
    address: Address,
    aggregate: Function,
}

impl Multicall {
    pub fn new(address: Address, abi: &Contract) -> Result<Self, MulticallError> {
        Ok(Multicall {
            address,
            aggregate: function(abi, "aggregate")?,
        })
    }

    pub fn with_bundled_abi(address: Address) -> Result<Self, MulticallError> {
        Self::new(address, &load_abi(MULTICALL_ABI)?)
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn aggregate_function(&self) -> &Function {
        &self.aggregate
    }

    /// Execute all `calls` in one round trip.
    ///
    /// # errors
    ///
    /// * the transport failed, or one of the calls reverted (the whole
    ///   batch fails with it);
    /// * a call could not be encoded or its output decoded with its ABI;
    /// * the response does not hold exactly one result per call.
    pub async fn aggregate<T: EthCall + ?Sized>(
        &self,
        transport: &T,
        calls: &[Call<'_>],
    ) -> Result<Aggregated, MulticallError> {
        let encoded = calls
            .iter()
            .map(|call| {
                Ok(Token::Tuple(vec![
                    Token::Address(call.target),
                    Token::Bytes(call.encode()?),
                ]))
            })
            .collect::<Result<Vec<_>, MulticallError>>()?;

        let data = self
            .aggregate
            .encode_input(&[Token::Array(encoded)])
            .map_err(|source| MulticallError::Encode {
                target: self.address,
                function: self.aggregate.name.clone(),
                source,
            })?;

        debug!(multicall = ?self.address, calls = calls.len(), "sending aggregate call");

        let raw = transport.call(self.address, data).await?;

        let mut tokens = self
            .aggregate
            .decode_output(&raw)
            .map_err(MulticallError::Aggregate)?
            .into_iter();

        let (block_number, return_data) = match (tokens.next(), tokens.next()) {
            (Some(Token::Uint(block_number)), Some(Token::Array(return_data))) => {
                (block_number, return_data)
            }
            _ => return Err(MulticallError::MalformedResponse),
        };

        if return_data.len() != calls.len() {
            return Err(MulticallError::LengthMismatch {
                expected: calls.len(),
                actual: return_data.len(),
            });
        }

        let results = calls
            .iter()
            .zip(return_data)
            .map(|(call, token)| {
                let bytes = token.into_bytes().ok_or(MulticallError::MalformedResponse)?;
                let tokens = call.function.decode_output(&bytes).map_err(|source| {
                    MulticallError::Decode {
                        target: call.target,
                        function: call.function.name.clone(),
                        source,
                    }
                })?;
                Ok(ReturnValues::new(call.function, tokens))
            })
            .collect::<Result<Vec<_>, MulticallError>>()?;

        debug!(%block_number, results = results.len(), "aggregate call returned");

        Ok(Aggregated {
            block_number,
            results,
        })
    }
}

/// Execute `calls` through `multicall` and return one decoded result per
/// call, in input order.
pub async fn multicall<T: EthCall + ?Sized>(
    transport: &T,
    multicall: &Multicall,
    calls: &[Call<'_>],
) -> Result<Vec<ReturnValues>, MulticallError> {
    if calls.is_empty() {
        return Ok(Vec::new());
    }
    multicall
        .aggregate(transport, calls)
        .await
        .map(|aggregated| aggregated.results)
}
