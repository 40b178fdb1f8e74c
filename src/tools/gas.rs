use super::{
    chain_id_property, create_tool, dispatch, object_schema, single_chain, Parameters, Tool,
    ToolConfig,
};
use crate::chains::SUPPORTED_CHAINS;
use crate::error::ToolError;
use crate::ethereum::{ChainClient, GasRequest};
use crate::units::{format_gwei, parse_ether};
use alloy::primitives::{Address, Bytes};
use anyhow::Result;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

pub const MAX_FEE_HISTORY_BLOCKS: u64 = 1024;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetGasPriceArgs {
    pub chain_id: Option<u64>,
    #[serde(default)]
    pub format_gwei: bool,
}

impl Parameters for GetGasPriceArgs {
    fn schema() -> Value {
        object_schema(
            json!({
                "chainId": chain_id_property(true),
                "formatGwei": {
                    "type": "boolean",
                    "description": "Return the price in gwei instead of wei"
                }
            }),
            &[],
        )
    }
}

pub fn get_gas_price() -> Arc<dyn Tool> {
    create_tool::<GetGasPriceArgs>(ToolConfig {
        name: "getGasPrice",
        description: "Get the current gas price. If chainId is not specified, will return gas price for all supported chains.",
        supported_chains: Some(SUPPORTED_CHAINS),
        execute: |client, args| Box::pin(execute_get_gas_price(client, args)),
    })
}

async fn execute_get_gas_price(client: &dyn ChainClient, args: GetGasPriceArgs) -> Result<Value> {
    let format = args.format_gwei;
    dispatch(client, SUPPORTED_CHAINS, args.chain_id, "gasPrice", move |public| async move {
        let price = public.get_gas_price().await?;
        let price = if format {
            format_gwei(price)?
        } else {
            price.to_string()
        };
        Ok(json!(price))
    })
    .await
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateGasArgs {
    pub to: Address,
    /// Amount of ether to send, e.g. `"0.1"`.
    pub value: Option<String>,
    pub data: Option<Bytes>,
    pub chain_id: Option<u64>,
}

impl Parameters for EstimateGasArgs {
    fn schema() -> Value {
        object_schema(
            json!({
                "to": { "type": "string", "description": "Recipient address" },
                "value": { "type": "string", "description": "Amount of ETH to send, in ether" },
                "data": { "type": "string", "description": "Hex encoded calldata" },
                "chainId": chain_id_property(true)
            }),
            &["to"],
        )
    }

    fn validate(&self) -> Result<(), ToolError> {
        if let Some(value) = &self.value {
            parse_ether(value)?;
        }
        Ok(())
    }
}

pub fn estimate_gas() -> Arc<dyn Tool> {
    create_tool::<EstimateGasArgs>(ToolConfig {
        name: "estimateGas",
        description: "Estimate gas for a transaction",
        supported_chains: Some(SUPPORTED_CHAINS),
        execute: |client, args| Box::pin(execute_estimate_gas(client, args)),
    })
}

async fn execute_estimate_gas(client: &dyn ChainClient, args: EstimateGasArgs) -> Result<Value> {
    let from = client.address().await?;
    let request = GasRequest {
        from,
        to: args.to,
        value: args.value.as_deref().map(parse_ether).transpose()?,
        data: args.data,
    };

    dispatch(client, SUPPORTED_CHAINS, args.chain_id, "gas", move |public| {
        let request = request.clone();
        async move {
            let gas = public.estimate_gas(request).await?;
            Ok(json!(gas.to_string()))
        }
    })
    .await
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetFeeHistoryArgs {
    pub block_count: u64,
    pub reward_percentiles: Option<Vec<f64>>,
    pub chain_id: u64,
}

impl Parameters for GetFeeHistoryArgs {
    fn schema() -> Value {
        object_schema(
            json!({
                "blockCount": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": MAX_FEE_HISTORY_BLOCKS,
                    "description": "Number of blocks in the requested range. Between 1 and 1024 blocks can be requested in a single query. Less than requested may be returned if not all blocks are available."
                },
                "rewardPercentiles": {
                    "type": "array",
                    "items": { "type": "number", "minimum": 0, "maximum": 100 },
                    "description": "A monotonically increasing list of percentile values to sample from each block's effective priority fees per gas in ascending order, weighted by gas used."
                },
                "chainId": chain_id_property(false)
            }),
            &["blockCount", "chainId"],
        )
    }

    fn validate(&self) -> Result<(), ToolError> {
        if !(1..=MAX_FEE_HISTORY_BLOCKS).contains(&self.block_count) {
            return Err(ToolError::invalid(format!(
                "blockCount must be between 1 and {MAX_FEE_HISTORY_BLOCKS}, got {}",
                self.block_count
            )));
        }

        let percentiles = self.reward_percentiles.as_deref().unwrap_or_default();
        if let Some(p) = percentiles.iter().find(|p| !(0.0..=100.0).contains(*p)) {
            return Err(ToolError::invalid(format!(
                "reward percentile {p} is outside 0..=100"
            )));
        }
        if percentiles.windows(2).any(|w| w[1] < w[0]) {
            return Err(ToolError::invalid("rewardPercentiles must be in ascending order"));
        }
        Ok(())
    }
}

pub fn get_fee_history() -> Arc<dyn Tool> {
    create_tool::<GetFeeHistoryArgs>(ToolConfig {
        name: "getFeeHistory",
        description: "Get historical gas fee info",
        supported_chains: Some(SUPPORTED_CHAINS),
        execute: |client, args| Box::pin(execute_get_fee_history(client, args)),
    })
}

async fn execute_get_fee_history(client: &dyn ChainClient, args: GetFeeHistoryArgs) -> Result<Value> {
    let public = single_chain(client, SUPPORTED_CHAINS, args.chain_id)?;
    let percentiles = args.reward_percentiles.unwrap_or_default();
    public.get_fee_history(args.block_count, &percentiles).await
}
