use super::{
    chain_id_property, clean, create_tool, dispatch, object_schema, single_chain, Parameters, Tool,
    ToolConfig,
};
use crate::chains::SUPPORTED_CHAINS;
use crate::ethereum::{BlockSelector, ChainClient};
use alloy::primitives::B256;
use anyhow::Result;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetBlockArgs {
    pub block_number: Option<u64>,
    pub block_hash: Option<B256>,
    pub chain_id: u64,
}

impl GetBlockArgs {
    /// A hash wins over a number; with neither the latest block is fetched.
    pub fn selector(&self) -> BlockSelector {
        match (self.block_hash, self.block_number) {
            (Some(hash), _) => BlockSelector::Hash(hash),
            (None, Some(number)) => BlockSelector::Number(number),
            (None, None) => BlockSelector::Latest,
        }
    }
}

impl Parameters for GetBlockArgs {
    fn schema() -> Value {
        object_schema(
            json!({
                "blockNumber": {
                    "type": "integer",
                    "minimum": 0,
                    "description": "Block number to fetch"
                },
                "blockHash": {
                    "type": "string",
                    "description": "Block hash to fetch. Takes precedence over blockNumber."
                },
                "chainId": chain_id_property(false)
            }),
            &["chainId"],
        )
    }
}

pub fn get_block() -> Arc<dyn Tool> {
    create_tool::<GetBlockArgs>(ToolConfig {
        name: "getBlock",
        description: "Get information about a block",
        supported_chains: Some(SUPPORTED_CHAINS),
        execute: |client, args| Box::pin(execute_get_block(client, args)),
    })
}

async fn execute_get_block(client: &dyn ChainClient, args: GetBlockArgs) -> Result<Value> {
    let public = single_chain(client, SUPPORTED_CHAINS, args.chain_id)?;
    let block = public.get_block(args.selector()).await?;
    Ok(clean(block))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetBlockNumberArgs {
    pub chain_id: Option<u64>,
}

impl Parameters for GetBlockNumberArgs {
    fn schema() -> Value {
        object_schema(json!({ "chainId": chain_id_property(true) }), &[])
    }
}

pub fn get_block_number() -> Arc<dyn Tool> {
    create_tool::<GetBlockNumberArgs>(ToolConfig {
        name: "getBlockNumber",
        description: "Get the current block number",
        supported_chains: Some(SUPPORTED_CHAINS),
        execute: |client, args| Box::pin(execute_get_block_number(client, args)),
    })
}

async fn execute_get_block_number(
    client: &dyn ChainClient,
    args: GetBlockNumberArgs,
) -> Result<Value> {
    dispatch(client, SUPPORTED_CHAINS, args.chain_id, "blockNumber", |public| async move {
        let number = public.get_block_number().await?;
        Ok(json!(number.to_string()))
    })
    .await
}
