use super::{chain_id_property, clean, create_tool, object_schema, single_chain, Parameters, Tool, ToolConfig};
use crate::chains::SUPPORTED_CHAINS;
use crate::ethereum::ChainClient;
use alloy::primitives::B256;
use anyhow::Result;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionHashArgs {
    pub hash: B256,
    pub chain_id: u64,
}

impl Parameters for TransactionHashArgs {
    fn schema() -> Value {
        object_schema(
            json!({
                "hash": { "type": "string", "description": "Transaction hash" },
                "chainId": chain_id_property(false)
            }),
            &["hash", "chainId"],
        )
    }
}

pub fn get_transaction() -> Arc<dyn Tool> {
    create_tool::<TransactionHashArgs>(ToolConfig {
        name: "getTransaction",
        description: "Get details about a transaction",
        supported_chains: Some(SUPPORTED_CHAINS),
        execute: |client, args| Box::pin(execute_get_transaction(client, args)),
    })
}

async fn execute_get_transaction(client: &dyn ChainClient, args: TransactionHashArgs) -> Result<Value> {
    let public = single_chain(client, SUPPORTED_CHAINS, args.chain_id)?;
    let tx = public.get_transaction(args.hash).await?;
    Ok(clean(tx))
}

pub fn get_transaction_receipt() -> Arc<dyn Tool> {
    create_tool::<TransactionHashArgs>(ToolConfig {
        name: "getTransactionReceipt",
        description: "Get the receipt of a transaction",
        supported_chains: Some(SUPPORTED_CHAINS),
        execute: |client, args| Box::pin(execute_get_transaction_receipt(client, args)),
    })
}

async fn execute_get_transaction_receipt(
    client: &dyn ChainClient,
    args: TransactionHashArgs,
) -> Result<Value> {
    let public = single_chain(client, SUPPORTED_CHAINS, args.chain_id)?;
    let receipt = public.get_transaction_receipt(args.hash).await?;
    Ok(clean(receipt))
}
