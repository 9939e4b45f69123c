pub mod contracts;
pub mod decode;
pub mod error;
pub mod multicall;
pub mod registry;
pub mod transport;

#[cfg(any(test, feature = "property-test-api"))]
pub mod testing;

pub use crate::{
    contracts::{DaoRegistry, OffchainVoting},
    error::{DecodeError, MulticallError, TransportError},
    multicall::{multicall, Aggregated, Call, Multicall, ReturnValues},
    registry::{adapter_id, resolve_adapters},
    transport::EthCall,
};
pub use ethabi;
