pub mod account;
pub mod block;
pub mod ens;
pub mod gas;
pub mod transaction;

use crate::chains::{self, Chain};
use crate::error::ToolError;
use crate::ethereum::{ChainClient, PublicClient};
use anyhow::{bail, Result};
use futures::future::{try_join_all, BoxFuture};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn schema(&self) -> Value;
    /// Chains the tool may query. `None` for tools bound to the client's
    /// default chain.
    fn supported_chains(&self) -> Option<&'static [Chain]>;
    async fn call(&self, client: &dyn ChainClient, args: Value) -> Result<Value>;
}

/// Typed arguments of a tool. The JSON schema advertised to agents and the
/// checks serde cannot express live together here.
pub trait Parameters: DeserializeOwned + Send + 'static {
    fn schema() -> Value;

    fn validate(&self) -> Result<(), ToolError> {
        Ok(())
    }
}

pub type Execute<A> = for<'a> fn(&'a dyn ChainClient, A) -> BoxFuture<'a, Result<Value>>;

pub struct ToolConfig<A> {
    pub name: &'static str,
    pub description: &'static str,
    pub supported_chains: Option<&'static [Chain]>,
    pub execute: Execute<A>,
}

struct FnTool<A> {
    config: ToolConfig<A>,
}

/// Packages a tool definition into a [`Tool`]. Arguments are checked against
/// `A` on every call, before `execute` runs.
pub fn create_tool<A: Parameters>(config: ToolConfig<A>) -> Arc<dyn Tool> {
    Arc::new(FnTool { config })
}

#[async_trait::async_trait]
impl<A: Parameters> Tool for FnTool<A> {
    fn name(&self) -> &'static str {
        self.config.name
    }

    fn description(&self) -> &'static str {
        self.config.description
    }

    fn schema(&self) -> Value {
        A::schema()
    }

    fn supported_chains(&self) -> Option<&'static [Chain]> {
        self.config.supported_chains
    }

    async fn call(&self, client: &dyn ChainClient, args: Value) -> Result<Value> {
        let args = parse_args::<A>(args)?;
        debug!(tool = self.config.name, "executing tool");
        (self.config.execute)(client, args).await
    }
}

pub fn parse_args<A: Parameters>(args: Value) -> Result<A, ToolError> {
    let args = if args.is_null() { json!({}) } else { args };
    let parsed: A = serde_json::from_value(args).map_err(|e| ToolError::invalid(e.to_string()))?;
    parsed.validate()?;
    Ok(parsed)
}

/// Resolves the client for an explicitly requested chain, refusing chains
/// outside `supported` or outside what the client permits.
pub fn single_chain(
    client: &dyn ChainClient,
    supported: &[Chain],
    chain_id: u64,
) -> Result<Arc<dyn PublicClient>> {
    if client.filter_supported_chains(supported, Some(chain_id)).is_empty() {
        if chains::by_id(chain_id).is_none() {
            return Err(ToolError::UnknownChain(chain_id).into());
        }
        return Err(ToolError::ChainNotPermitted(chain_id).into());
    }
    client.public_client(Some(chain_id))
}

/// Runs `query` against one chain when `chain_id` is given and returns its
/// value as is. Otherwise runs it concurrently on every permitted chain and
/// returns `[{"chainId": id, field: value}, ..]` in chain-list order. The
/// first failing chain fails the whole call.
pub async fn dispatch<F, Fut>(
    client: &dyn ChainClient,
    supported: &[Chain],
    chain_id: Option<u64>,
    field: &'static str,
    query: F,
) -> Result<Value>
where
    F: Fn(Arc<dyn PublicClient>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value>> + Send,
{
    if let Some(id) = chain_id {
        let public = single_chain(client, supported, id)?;
        return query(public).await;
    }

    let targets = client.filter_supported_chains(supported, None);
    debug!(field, chains = targets.len(), "fanning out");

    let legs = targets.iter().map(|chain| {
        let id = chain.id;
        let leg = client.public_client(Some(id)).map(&query);
        async move {
            let value = leg?.await?;
            debug!(field, chain_id = id, "chain responded");
            let mut entry = Map::new();
            entry.insert("chainId".to_string(), json!(id));
            entry.insert(field.to_string(), value);
            Ok::<_, anyhow::Error>(Value::Object(entry))
        }
    });

    Ok(Value::Array(try_join_all(legs).await?))
}

/// Drops null-valued fields at every depth, leaving only populated data.
pub fn clean(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, clean(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(clean).collect()),
        other => other,
    }
}

pub(crate) fn object_schema(properties: Value, required: &[&str]) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

pub(crate) fn chain_id_property(optional: bool) -> Value {
    let description = if optional {
        "Chain ID to query. If omitted, every supported chain is queried."
    } else {
        "Chain ID to query"
    };
    json!({ "type": "integer", "description": description })
}

#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: BTreeMap<&'static str, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Result<Self> {
        let mut registry = Self::new();
        for tool in all_tools() {
            registry.register(tool)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<()> {
        let name = tool.name();
        if self.tools.contains_key(name) {
            bail!("tool {name} is already registered");
        }
        self.tools.insert(name, tool);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Tool>> {
        self.tools.values()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

pub fn all_tools() -> Vec<Arc<dyn Tool>> {
    vec![
        account::get_balance(),
        account::get_code(),
        account::get_transaction_count(),
        block::get_block(),
        block::get_block_number(),
        gas::get_gas_price(),
        gas::estimate_gas(),
        gas::get_fee_history(),
        transaction::get_transaction(),
        transaction::get_transaction_receipt(),
        ens::resolve_ens(),
        ens::lookup_ens(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_strips_nulls_recursively() {
        let raw = json!({
            "hash": "0xabc",
            "to": null,
            "logs": [{ "data": "0x", "removed": null }],
            "nested": { "a": null, "b": 1 }
        });
        assert_eq!(
            clean(raw),
            json!({
                "hash": "0xabc",
                "logs": [{ "data": "0x" }],
                "nested": { "b": 1 }
            })
        );
    }

    #[test]
    fn default_registry_has_unique_names() {
        let registry = ToolRegistry::with_defaults().unwrap();
        assert_eq!(registry.len(), all_tools().len());
        assert!(registry.get("getFeeHistory").is_some());
    }

    #[test]
    fn duplicate_registration_fails() {
        let mut registry = ToolRegistry::new();
        registry.register(account::get_balance()).unwrap();
        assert!(registry.register(account::get_balance()).is_err());
    }
}
