#![allow(dead_code)]

use alloy::primitives::{address, Address, Bytes, B256, U256};
use anyhow::{bail, Result};
use evm_agent_tools::ethereum::{BlockSelector, EthereumClient, GasRequest, PublicClient};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const ACCOUNT: Address = address!("d8dA6BF26964aF9D7eEd9e03E53415D37aA96045");
pub const CONTRACT: Address = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");

/// In-memory chain with canned answers derived from its id.
pub struct MockChain {
    pub chain_id: u64,
    pub balance: U256,
    pub code: Bytes,
    pub gas_price: U256,
    pub delay: Duration,
    pub fail: bool,
    pub ens: HashMap<String, Address>,
    pub calls: AtomicUsize,
    pub last_block: Mutex<Option<BlockSelector>>,
    pub last_gas_request: Mutex<Option<GasRequest>>,
}

impl MockChain {
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            balance: U256::from(chain_id) * U256::from(10u64).pow(U256::from(18u64)),
            code: Bytes::new(),
            gas_price: U256::from(chain_id * 1_000_000_000),
            delay: Duration::ZERO,
            fail: false,
            ens: HashMap::new(),
            calls: AtomicUsize::new(0),
            last_block: Mutex::new(None),
            last_gas_request: Mutex::new(None),
        }
    }

    pub fn with_delay(mut self, millis: u64) -> Self {
        self.delay = Duration::from_millis(millis);
        self
    }

    pub fn with_balance(mut self, wei: U256) -> Self {
        self.balance = wei;
        self
    }

    pub fn with_gas_price(mut self, wei: U256) -> Self {
        self.gas_price = wei;
        self
    }

    pub fn with_code(mut self, code: Bytes) -> Self {
        self.code = code;
        self
    }

    pub fn with_ens(mut self, name: &str, address: Address) -> Self {
        self.ens.insert(name.to_string(), address);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn hit(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail {
            bail!("rpc error on chain {}", self.chain_id);
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl PublicClient for MockChain {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn get_balance(&self, _address: Address) -> Result<U256> {
        self.hit().await?;
        Ok(self.balance)
    }

    async fn get_code(&self, _address: Address) -> Result<Bytes> {
        self.hit().await?;
        Ok(self.code.clone())
    }

    async fn get_transaction_count(&self, _address: Address) -> Result<u64> {
        self.hit().await?;
        Ok(self.chain_id + 7)
    }

    async fn get_block(&self, block: BlockSelector) -> Result<Value> {
        self.hit().await?;
        *self.last_block.lock().unwrap() = Some(block);
        Ok(json!({
            "number": "0x64",
            "hash": format!("{}", B256::repeat_byte(0xab)),
            "baseFeePerGas": null,
            "transactions": []
        }))
    }

    async fn get_block_number(&self) -> Result<u64> {
        self.hit().await?;
        Ok(self.chain_id * 100)
    }

    async fn get_gas_price(&self) -> Result<U256> {
        self.hit().await?;
        Ok(self.gas_price)
    }

    async fn estimate_gas(&self, request: GasRequest) -> Result<U256> {
        self.hit().await?;
        *self.last_gas_request.lock().unwrap() = Some(request);
        Ok(U256::from(21_000u64))
    }

    async fn get_fee_history(&self, block_count: u64, reward_percentiles: &[f64]) -> Result<Value> {
        self.hit().await?;
        Ok(json!({
            "oldestBlock": "0x1",
            "blockCount": block_count,
            "rewardPercentiles": reward_percentiles
        }))
    }

    async fn get_transaction(&self, hash: B256) -> Result<Value> {
        self.hit().await?;
        Ok(json!({ "hash": format!("{hash}"), "to": null, "chainId": self.chain_id }))
    }

    async fn get_transaction_receipt(&self, hash: B256) -> Result<Value> {
        self.hit().await?;
        Ok(json!({
            "transactionHash": format!("{hash}"),
            "contractAddress": null,
            "logs": [{ "removed": false, "blockTimestamp": null }]
        }))
    }

    async fn get_ens_address(&self, name: &str) -> Result<Option<Address>> {
        self.hit().await?;
        Ok(self.ens.get(&name.to_lowercase()).copied())
    }

    async fn get_ens_name(&self, address: Address) -> Result<Option<String>> {
        self.hit().await?;
        Ok(self
            .ens
            .iter()
            .find(|(_, a)| **a == address)
            .map(|(name, _)| name.clone()))
    }
}

/// A client over `chains`; the first chain is the default one.
pub fn client_with(chains: Vec<MockChain>) -> (EthereumClient, Vec<Arc<MockChain>>) {
    client_with_account(chains, Some(ACCOUNT))
}

pub fn client_with_account(
    chains: Vec<MockChain>,
    account: Option<Address>,
) -> (EthereumClient, Vec<Arc<MockChain>>) {
    let default_chain = chains.first().map(|c| c.chain_id).unwrap_or(1);
    let mocks: Vec<Arc<MockChain>> = chains.into_iter().map(Arc::new).collect();
    let clients = mocks
        .iter()
        .map(|m| m.clone() as Arc<dyn PublicClient>)
        .collect::<Vec<_>>();
    (
        EthereumClient::from_clients(clients, default_chain, account),
        mocks,
    )
}
