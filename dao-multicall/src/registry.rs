//! Adapter lookup in the DAO registry.

use crate::{
    contracts::DaoRegistry,
    decode,
    error::MulticallError,
    multicall::Multicall,
    transport::EthCall,
};
use dao_core::{address::is_not_zero_address, Address, AdapterName};
use ethereum_types::H256;
use sha3::{Digest, Keccak256};
use std::collections::HashMap;
use tracing::{debug, info};

/// Registry key of an adapter: `keccak256(name)`.
pub fn adapter_id(name: AdapterName) -> H256 {
    H256::from_slice(Keccak256::digest(name.as_ref().as_bytes()).as_slice())
}

/// Look up the addresses registered for `names` in one batch.
///
/// Names without a registered adapter are left out of the result.
pub async fn resolve_adapters<T: EthCall + ?Sized>(
    transport: &T,
    multicall: &Multicall,
    registry: &DaoRegistry,
    names: &[AdapterName],
) -> Result<HashMap<AdapterName, Address>, MulticallError> {
    let calls: Vec<_> = names
        .iter()
        .map(|name| registry.adapter(adapter_id(*name)))
        .collect();

    let results = crate::multicall::multicall(transport, multicall, &calls).await?;

    let mut resolved = HashMap::with_capacity(names.len());
    for (name, values) in names.iter().zip(results.iter()) {
        let address = decode::address(values)?;
        if is_not_zero_address(&address) {
            resolved.insert(*name, address);
        } else {
            debug!(adapter = %name, "adapter not registered");
        }
    }

    info!(
        registry = ?registry.address(),
        requested = names.len(),
        resolved = resolved.len(),
        "resolved DAO adapters"
    );

    Ok(resolved)
}
