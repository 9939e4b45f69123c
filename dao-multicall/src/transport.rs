use crate::error::TransportError;
use async_trait::async_trait;
use dao_core::Address;
use std::sync::Arc;

/// Read-only access to an EVM node, i.e. `eth_call` against the latest
/// block.
///
/// Implemented by the host on top of whatever RPC provider it is connected
/// to. Calls never modify chain state, so implementations can be shared
/// freely between tasks.
#[async_trait]
pub trait EthCall: Send + Sync {
    /// Execute `data` against the contract at `to` and return the raw
    /// return data.
    async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>, TransportError>;
}

#[async_trait]
impl<T: EthCall + ?Sized> EthCall for Arc<T> {
    async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        (**self).call(to, data).await
    }
}
