use alloy::primitives::Address;
use anyhow::{bail, Context};
use std::collections::BTreeMap;
use std::env;
use std::str::FromStr;

use crate::chains::{self, MAINNET};

#[derive(Clone, Debug)]
pub struct Config {
    /// Endpoint overrides keyed by chain id. Chains without an entry use
    /// their default public endpoint.
    pub rpc_urls: BTreeMap<u64, String>,
    /// When set, only these chains are reachable through the client.
    pub allowed_chains: Option<Vec<u64>>,
    pub default_chain_id: u64,
    pub private_key: Option<String>,
    pub account_address: Option<Address>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_urls: BTreeMap::new(),
            allowed_chains: None,
            default_chain_id: MAINNET.id,
            private_key: None,
            account_address: None,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        for chain in chains::SUPPORTED_CHAINS {
            if let Some(url) = get(&format!("RPC_URL_{}", chain.id)) {
                config.rpc_urls.insert(chain.id, url);
            }
        }
        if let Some(url) = get("ETHEREUM_RPC_URL") {
            config.rpc_urls.entry(MAINNET.id).or_insert(url);
        }

        if let Some(list) = get("ALLOWED_CHAINS") {
            let ids = list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(parse_chain_id)
                .collect::<anyhow::Result<Vec<_>>>()
                .context("ALLOWED_CHAINS must be a comma-separated list of chain ids")?;
            config.allowed_chains = Some(ids);
        }

        if let Some(id) = get("DEFAULT_CHAIN_ID") {
            config.default_chain_id = parse_chain_id(&id).context("invalid DEFAULT_CHAIN_ID")?;
        } else if !config.is_allowed(MAINNET.id) {
            let first = config.allowed_chains.as_ref().and_then(|ids| ids.first().copied());
            config.default_chain_id = first.unwrap_or(MAINNET.id);
        }
        if let Some(allowed) = &config.allowed_chains {
            if !allowed.contains(&config.default_chain_id) {
                bail!(
                    "default chain {} is not in ALLOWED_CHAINS",
                    config.default_chain_id
                );
            }
        }

        config.private_key = get("PRIVATE_KEY");
        if let Some(addr) = get("ACCOUNT_ADDRESS") {
            config.account_address =
                Some(Address::from_str(addr.trim()).context("invalid ACCOUNT_ADDRESS")?);
        }

        Ok(config)
    }

    pub fn rpc_url(&self, chain_id: u64) -> Option<&str> {
        self.rpc_urls
            .get(&chain_id)
            .map(String::as_str)
            .or_else(|| chains::by_id(chain_id).map(|c| c.default_rpc_url))
    }

    pub fn is_allowed(&self, chain_id: u64) -> bool {
        self.allowed_chains
            .as_ref()
            .map_or(true, |allowed| allowed.contains(&chain_id))
    }
}

fn parse_chain_id(raw: &str) -> anyhow::Result<u64> {
    let id: u64 = raw.trim().parse().with_context(|| format!("{raw:?} is not a chain id"))?;
    if chains::by_id(id).is_none() {
        bail!("chain {id} is not supported");
    }
    Ok(id)
}
