use alloy::{
    primitives::{address, keccak256, Address, Bytes, B256},
    providers::Provider,
    rpc::types::eth::TransactionRequest,
    sol,
    sol_types::SolCall,
};
use anyhow::Result;

use crate::error::ToolError;
use crate::ethereum::HttpProvider;

/// ENS registry, deployed at the same address on mainnet and testnets.
pub const ENS_REGISTRY: Address = address!("00000000000C2E074eC69A0bFb2997BA6C7d2e1e");

sol! {
    #[allow(missing_docs)]
    function resolver(bytes32 node) external view returns (address);
    #[allow(missing_docs)]
    function addr(bytes32 node) external view returns (address);
    #[allow(missing_docs)]
    function name(bytes32 node) external view returns (string);
}

/// Lowercases and trims a name. Empty labels are rejected.
pub fn normalize(name: &str) -> Result<String, ToolError> {
    let normalized = name.trim().to_lowercase();
    if normalized.is_empty() || normalized.split('.').any(str::is_empty) {
        return Err(ToolError::invalid(format!("{name:?} is not a valid ENS name")));
    }
    Ok(normalized)
}

/// EIP-137 namehash of an already-normalized name.
pub fn namehash(name: &str) -> B256 {
    let mut node = B256::ZERO;
    if name.is_empty() {
        return node;
    }
    for label in name.rsplit('.') {
        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(node.as_slice());
        buf[32..].copy_from_slice(keccak256(label.as_bytes()).as_slice());
        node = keccak256(buf);
    }
    node
}

/// Node of a primary name read from a reverse record, or `None` when the
/// stored name is not a usable ENS name.
pub fn primary_name_node(primary: &str) -> Option<B256> {
    normalize(primary).ok().map(|name| namehash(&name))
}

pub fn reverse_name(address: Address) -> String {
    format!("{}.addr.reverse", hex::encode(address))
}

async fn eth_call(provider: &HttpProvider, to: Address, data: Vec<u8>) -> Result<Bytes> {
    let tx = TransactionRequest::default().to(to).input(data.into());
    Ok(provider.call(&tx).await?)
}

async fn resolver_for(provider: &HttpProvider, node: B256) -> Result<Option<Address>> {
    let res = eth_call(provider, ENS_REGISTRY, resolverCall { node }.abi_encode()).await?;
    let resolver = resolverCall::abi_decode_returns(&res, true)?._0;
    Ok((resolver != Address::ZERO).then_some(resolver))
}

/// Forward resolution. `None` when the name has no resolver or no address.
pub async fn resolve_address(provider: &HttpProvider, ens_name: &str) -> Result<Option<Address>> {
    resolve_node(provider, namehash(&normalize(ens_name)?)).await
}

async fn resolve_node(provider: &HttpProvider, node: B256) -> Result<Option<Address>> {
    let Some(resolver) = resolver_for(provider, node).await? else {
        return Ok(None);
    };
    let res = eth_call(provider, resolver, addrCall { node }.abi_encode()).await?;
    let resolved = addrCall::abi_decode_returns(&res, true)?._0;
    Ok((resolved != Address::ZERO).then_some(resolved))
}

/// Reverse resolution. The primary name only counts if it resolves back to
/// `address`.
pub async fn lookup_name(provider: &HttpProvider, address: Address) -> Result<Option<String>> {
    let node = namehash(&reverse_name(address));
    let Some(resolver) = resolver_for(provider, node).await? else {
        return Ok(None);
    };
    let res = eth_call(provider, resolver, nameCall { node }.abi_encode()).await?;
    let primary = nameCall::abi_decode_returns(&res, true)?._0;
    let Some(primary_node) = primary_name_node(&primary) else {
        return Ok(None);
    };

    match resolve_node(provider, primary_node).await? {
        Some(forward) if forward == address => Ok(Some(primary)),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::b256;

    #[test]
    fn namehash_matches_eip137_vectors() {
        assert_eq!(namehash(""), B256::ZERO);
        assert_eq!(
            namehash("eth"),
            b256!("93cdeb708b7545dc668eb9280176169d1c33cfd8ed6f04690a0bcc88a93fc4ae")
        );
        assert_eq!(
            namehash("foo.eth"),
            b256!("de9b09fd7c5f901e23a3f19fecc54828e9c848539801e86591bd9801b019f84f")
        );
    }

    #[test]
    fn normalize_lowercases_and_rejects_empty_labels() {
        assert_eq!(normalize(" Vitalik.ETH ").unwrap(), "vitalik.eth");
        assert!(normalize("").is_err());
        assert!(normalize("foo..eth").is_err());
    }

    #[test]
    fn malformed_primary_names_have_no_node() {
        assert_eq!(primary_name_node("Foo.ETH"), Some(namehash("foo.eth")));
        assert_eq!(primary_name_node(""), None);
        assert_eq!(primary_name_node("foo..eth"), None);
    }

    #[test]
    fn reverse_name_is_lowercase_hex_without_prefix() {
        let addr = address!("d8dA6BF26964aF9D7eEd9e03E53415D37aA96045");
        assert_eq!(
            reverse_name(addr),
            "d8da6bf26964af9d7eed9e03e53415d37aa96045.addr.reverse"
        );
    }
}
