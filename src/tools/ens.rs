use super::{create_tool, object_schema, Parameters, Tool, ToolConfig};
use crate::ens::normalize;
use crate::error::ToolError;
use crate::ethereum::ChainClient;
use alloy::primitives::Address;
use anyhow::Result;
use serde::Deserialize;
use serde_json::{json, Value};
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct ResolveEnsArgs {
    pub name: String,
}

impl Parameters for ResolveEnsArgs {
    fn schema() -> Value {
        object_schema(
            json!({
                "name": { "type": "string", "description": "The ENS name to resolve" }
            }),
            &["name"],
        )
    }

    fn validate(&self) -> Result<(), ToolError> {
        normalize(&self.name).map(|_| ())
    }
}

pub fn resolve_ens() -> Arc<dyn Tool> {
    create_tool::<ResolveEnsArgs>(ToolConfig {
        name: "resolveENS",
        description: "Resolves an ENS name to an Ethereum address",
        supported_chains: None,
        execute: |client, args| Box::pin(execute_resolve_ens(client, args)),
    })
}

async fn execute_resolve_ens(client: &dyn ChainClient, args: ResolveEnsArgs) -> Result<Value> {
    let public = client.public_client(None)?;
    let resolved = public.get_ens_address(&args.name).await?;
    Ok(json!(resolved.map(|a| a.to_checksum(None))))
}

#[derive(Debug, Deserialize)]
pub struct LookupEnsArgs {
    pub address: String,
}

impl LookupEnsArgs {
    pub fn parsed_address(&self) -> Result<Address, ToolError> {
        let hex = self
            .address
            .strip_prefix("0x")
            .filter(|h| h.len() == 40 && h.bytes().all(|b| b.is_ascii_hexdigit()))
            .ok_or_else(|| {
                ToolError::invalid(format!("{:?} is not a 0x-prefixed address", self.address))
            })?;
        Address::from_str(hex).map_err(|e| ToolError::invalid(e.to_string()))
    }
}

impl Parameters for LookupEnsArgs {
    fn schema() -> Value {
        object_schema(
            json!({
                "address": {
                    "type": "string",
                    "pattern": "^0x[a-fA-F0-9]{40}$",
                    "description": "The Ethereum address to lookup"
                }
            }),
            &["address"],
        )
    }

    fn validate(&self) -> Result<(), ToolError> {
        self.parsed_address().map(|_| ())
    }
}

pub fn lookup_ens() -> Arc<dyn Tool> {
    create_tool::<LookupEnsArgs>(ToolConfig {
        name: "lookupENS",
        description: "Looks up the ENS name for an Ethereum address",
        supported_chains: None,
        execute: |client, args| Box::pin(execute_lookup_ens(client, args)),
    })
}

async fn execute_lookup_ens(client: &dyn ChainClient, args: LookupEnsArgs) -> Result<Value> {
    let address = args.parsed_address()?;
    let public = client.public_client(None)?;
    let name = public.get_ens_name(address).await?;
    Ok(json!(name))
}
