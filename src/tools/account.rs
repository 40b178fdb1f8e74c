use super::{chain_id_property, create_tool, dispatch, object_schema, Parameters, Tool, ToolConfig};
use crate::chains::SUPPORTED_CHAINS;
use crate::ethereum::ChainClient;
use crate::units::format_ether;
use alloy::primitives::Address;
use anyhow::Result;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetBalanceArgs {
    pub address: Address,
    pub chain_id: Option<u64>,
    #[serde(default)]
    pub format_eth: bool,
}

impl Parameters for GetBalanceArgs {
    fn schema() -> Value {
        object_schema(
            json!({
                "address": {
                    "type": "string",
                    "description": "The address to check the balance of"
                },
                "chainId": chain_id_property(true),
                "formatEth": {
                    "type": "boolean",
                    "description": "Return the balance in ether instead of wei"
                }
            }),
            &["address"],
        )
    }
}

pub fn get_balance() -> Arc<dyn Tool> {
    create_tool::<GetBalanceArgs>(ToolConfig {
        name: "getBalance",
        description: "Get the ETH balance for an address",
        supported_chains: Some(SUPPORTED_CHAINS),
        execute: |client, args| Box::pin(execute_get_balance(client, args)),
    })
}

async fn execute_get_balance(client: &dyn ChainClient, args: GetBalanceArgs) -> Result<Value> {
    let GetBalanceArgs {
        address,
        chain_id,
        format_eth,
    } = args;

    dispatch(client, SUPPORTED_CHAINS, chain_id, "balance", move |public| async move {
        let balance = public.get_balance(address).await?;
        let balance = if format_eth {
            format_ether(balance)?
        } else {
            balance.to_string()
        };
        Ok(json!(balance))
    })
    .await
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressArgs {
    pub address: Address,
    pub chain_id: Option<u64>,
}

impl Parameters for AddressArgs {
    fn schema() -> Value {
        object_schema(
            json!({
                "address": { "type": "string", "description": "The address to query" },
                "chainId": chain_id_property(true)
            }),
            &["address"],
        )
    }
}

pub fn get_code() -> Arc<dyn Tool> {
    create_tool::<AddressArgs>(ToolConfig {
        name: "getCode",
        description: "Get the bytecode of an address",
        supported_chains: Some(SUPPORTED_CHAINS),
        execute: |client, args| Box::pin(execute_get_code(client, args)),
    })
}

async fn execute_get_code(client: &dyn ChainClient, args: AddressArgs) -> Result<Value> {
    let address = args.address;
    dispatch(client, SUPPORTED_CHAINS, args.chain_id, "code", move |public| async move {
        let code = public.get_code(address).await?;
        // Accounts without code report null rather than "0x".
        if code.is_empty() {
            Ok(Value::Null)
        } else {
            Ok(json!(code))
        }
    })
    .await
}

pub fn get_transaction_count() -> Arc<dyn Tool> {
    create_tool::<AddressArgs>(ToolConfig {
        name: "getTransactionCount",
        description: "Get the number of transactions sent from an address",
        supported_chains: Some(SUPPORTED_CHAINS),
        execute: |client, args| Box::pin(execute_get_transaction_count(client, args)),
    })
}

async fn execute_get_transaction_count(client: &dyn ChainClient, args: AddressArgs) -> Result<Value> {
    let address = args.address;
    dispatch(client, SUPPORTED_CHAINS, args.chain_id, "count", move |public| async move {
        let count = public.get_transaction_count(address).await?;
        Ok(json!(count))
    })
    .await
}
