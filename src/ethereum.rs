use alloy::{
    primitives::{Address, Bytes, B256, U256},
    providers::{Provider, ProviderBuilder, RootProvider},
    rpc::types::eth::{BlockNumberOrTag, TransactionRequest},
    signers::local::PrivateKeySigner,
    transports::http::{Client, Http},
};
use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

use crate::chains::{self, Chain};
use crate::config::Config;
use crate::ens;
use crate::error::ToolError;

pub type HttpProvider = RootProvider<Http<Client>>;

/// Which block `get_block` should fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockSelector {
    Latest,
    Number(u64),
    Hash(B256),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasRequest {
    pub from: Address,
    pub to: Address,
    pub value: Option<U256>,
    pub data: Option<Bytes>,
}

/// Read-only RPC handle scoped to a single chain.
///
/// Structured objects (blocks, transactions, receipts, fee history) are
/// returned as JSON exactly as the node reports them.
#[async_trait::async_trait]
pub trait PublicClient: Send + Sync {
    fn chain_id(&self) -> u64;
    async fn get_balance(&self, address: Address) -> Result<U256>;
    async fn get_code(&self, address: Address) -> Result<Bytes>;
    async fn get_transaction_count(&self, address: Address) -> Result<u64>;
    async fn get_block(&self, block: BlockSelector) -> Result<Value>;
    async fn get_block_number(&self) -> Result<u64>;
    async fn get_gas_price(&self) -> Result<U256>;
    async fn estimate_gas(&self, request: GasRequest) -> Result<U256>;
    async fn get_fee_history(&self, block_count: u64, reward_percentiles: &[f64]) -> Result<Value>;
    async fn get_transaction(&self, hash: B256) -> Result<Value>;
    async fn get_transaction_receipt(&self, hash: B256) -> Result<Value>;
    async fn get_ens_address(&self, name: &str) -> Result<Option<Address>>;
    async fn get_ens_name(&self, address: Address) -> Result<Option<String>>;
}

/// Capability object handed to every tool invocation.
#[async_trait::async_trait]
pub trait ChainClient: Send + Sync {
    /// Client for `chain_id`, or for the default chain when `None`.
    fn public_client(&self, chain_id: Option<u64>) -> Result<Arc<dyn PublicClient>>;

    /// The caller's own account.
    async fn address(&self) -> Result<Address>;

    /// Subset of `chains` this client may reach, narrowed to `chain_id` when
    /// given. Candidate order is preserved.
    fn filter_supported_chains(&self, chains: &[Chain], chain_id: Option<u64>) -> Vec<Chain>;
}

pub struct AlloyPublicClient {
    chain_id: u64,
    provider: HttpProvider,
}

impl AlloyPublicClient {
    pub fn new(chain_id: u64, rpc_url: &str) -> Result<Self> {
        let url = Url::parse(rpc_url).with_context(|| format!("invalid RPC URL for chain {chain_id}"))?;
        let provider = ProviderBuilder::new().on_http(url);
        Ok(Self { chain_id, provider })
    }
}

#[async_trait::async_trait]
impl PublicClient for AlloyPublicClient {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn get_balance(&self, address: Address) -> Result<U256> {
        Ok(self.provider.get_balance(address).await?)
    }

    async fn get_code(&self, address: Address) -> Result<Bytes> {
        Ok(self.provider.get_code_at(address).await?)
    }

    async fn get_transaction_count(&self, address: Address) -> Result<u64> {
        Ok(self.provider.get_transaction_count(address).await?)
    }

    async fn get_block(&self, block: BlockSelector) -> Result<Value> {
        let found: Option<Value> = match block {
            BlockSelector::Hash(hash) => {
                self.provider
                    .client()
                    .request("eth_getBlockByHash", (hash, false))
                    .await?
            }
            BlockSelector::Number(number) => {
                self.provider
                    .client()
                    .request("eth_getBlockByNumber", (BlockNumberOrTag::Number(number), false))
                    .await?
            }
            BlockSelector::Latest => {
                self.provider
                    .client()
                    .request("eth_getBlockByNumber", (BlockNumberOrTag::Latest, false))
                    .await?
            }
        };
        found
            .filter(|v| !v.is_null())
            .ok_or_else(|| ToolError::NotFound(format!("block {block:?} on chain {}", self.chain_id)).into())
    }

    async fn get_block_number(&self) -> Result<u64> {
        Ok(self.provider.get_block_number().await?)
    }

    async fn get_gas_price(&self) -> Result<U256> {
        let price = self.provider.get_gas_price().await?;
        Ok(U256::from(price))
    }

    async fn estimate_gas(&self, request: GasRequest) -> Result<U256> {
        let mut tx = TransactionRequest::default().from(request.from).to(request.to);
        if let Some(value) = request.value {
            tx = tx.value(value);
        }
        if let Some(data) = request.data {
            tx = tx.input(data.into());
        }
        let gas = self.provider.estimate_gas(&tx).await?;
        Ok(U256::from(gas))
    }

    async fn get_fee_history(&self, block_count: u64, reward_percentiles: &[f64]) -> Result<Value> {
        let history = self
            .provider
            .get_fee_history(block_count, BlockNumberOrTag::Latest, reward_percentiles)
            .await?;
        Ok(serde_json::to_value(history)?)
    }

    async fn get_transaction(&self, hash: B256) -> Result<Value> {
        let tx: Option<Value> = self
            .provider
            .client()
            .request("eth_getTransactionByHash", (hash,))
            .await?;
        tx.filter(|v| !v.is_null())
            .ok_or_else(|| ToolError::NotFound(format!("transaction {hash}")).into())
    }

    async fn get_transaction_receipt(&self, hash: B256) -> Result<Value> {
        let receipt: Option<Value> = self
            .provider
            .client()
            .request("eth_getTransactionReceipt", (hash,))
            .await?;
        receipt
            .filter(|v| !v.is_null())
            .ok_or_else(|| ToolError::NotFound(format!("receipt for transaction {hash}")).into())
    }

    async fn get_ens_address(&self, name: &str) -> Result<Option<Address>> {
        ens::resolve_address(&self.provider, name).await
    }

    async fn get_ens_name(&self, address: Address) -> Result<Option<String>> {
        ens::lookup_name(&self.provider, address).await
    }
}

/// Multi-chain client: one public client per reachable chain plus the
/// caller's account.
#[derive(Clone)]
pub struct EthereumClient {
    clients: HashMap<u64, Arc<dyn PublicClient>>,
    default_chain_id: u64,
    account: Option<Address>,
}

impl EthereumClient {
    pub fn new(config: &Config) -> Result<Self> {
        let mut clients: Vec<Arc<dyn PublicClient>> = Vec::new();
        for chain in chains::SUPPORTED_CHAINS.iter().filter(|c| config.is_allowed(c.id)) {
            let Some(url) = config.rpc_url(chain.id) else {
                continue;
            };
            info!("Configured chain {} ({})", chain.name, chain.id);
            clients.push(Arc::new(AlloyPublicClient::new(chain.id, url)?));
        }

        let account = match &config.private_key {
            Some(key) => {
                let signer = PrivateKeySigner::from_str(key.trim()).context("invalid PRIVATE_KEY")?;
                let address = signer.address();
                if config.account_address.is_some_and(|a| a != address) {
                    warn!("ACCOUNT_ADDRESS does not match PRIVATE_KEY; using the signer address");
                }
                Some(address)
            }
            None => config.account_address,
        };

        Ok(Self::from_clients(clients, config.default_chain_id, account))
    }

    /// Builds a client over already-constructed per-chain handles.
    pub fn from_clients(
        clients: impl IntoIterator<Item = Arc<dyn PublicClient>>,
        default_chain_id: u64,
        account: Option<Address>,
    ) -> Self {
        Self {
            clients: clients.into_iter().map(|c| (c.chain_id(), c)).collect(),
            default_chain_id,
            account,
        }
    }
}

#[async_trait::async_trait]
impl ChainClient for EthereumClient {
    fn public_client(&self, chain_id: Option<u64>) -> Result<Arc<dyn PublicClient>> {
        let id = chain_id.unwrap_or(self.default_chain_id);
        if let Some(client) = self.clients.get(&id) {
            return Ok(client.clone());
        }
        if chains::by_id(id).is_none() {
            return Err(ToolError::UnknownChain(id).into());
        }
        Err(ToolError::ChainNotPermitted(id).into())
    }

    async fn address(&self) -> Result<Address> {
        self.account.ok_or_else(|| ToolError::NoAccount.into())
    }

    fn filter_supported_chains(&self, chains: &[Chain], chain_id: Option<u64>) -> Vec<Chain> {
        chains
            .iter()
            .filter(|c| self.clients.contains_key(&c.id))
            .filter(|c| chain_id.map_or(true, |id| id == c.id))
            .copied()
            .collect()
    }
}
