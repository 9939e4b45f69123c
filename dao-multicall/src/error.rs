//! Errors related to batched contract reads.
use dao_core::Address;
use thiserror::Error;

/// Failure reported by the host's RPC provider.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(Box<dyn std::error::Error + Send + Sync>);

impl TransportError {
    pub fn new<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        TransportError(error.into())
    }
}

#[derive(Debug, Error)]
pub enum MulticallError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("cannot load contract ABI: {0}")]
    Abi(ethabi::Error),

    /// The ABI in use does not describe a function the client needs.
    #[error("contract ABI has no function `{0}`")]
    MissingFunction(String),

    #[error("cannot encode `{function}` call to {target:?}: {source}")]
    Encode {
        target: Address,
        function: String,
        source: ethabi::Error,
    },

    #[error("cannot decode the aggregate response: {0}")]
    Aggregate(ethabi::Error),

    /// The aggregate response decoded but does not have the
    /// `(uint256, bytes[])` shape.
    #[error("malformed aggregate response")]
    MalformedResponse,

    #[error("expected {expected} results from the aggregate call, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("cannot decode `{function}` output from {target:?}: {source}")]
    Decode {
        target: Address,
        function: String,
        source: ethabi::Error,
    },

    #[error(transparent)]
    Output(#[from] DecodeError),
}

/// A decoded call output does not fit the domain type it is read into.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("missing output `{0}`")]
    MissingOutput(&'static str),

    #[error("output `{name}` is not of type {expected}")]
    UnexpectedType {
        name: &'static str,
        expected: &'static str,
    },

    #[error("vote result code {0} does not fit in a uint8")]
    VoteResultOutOfRange(String),
}
