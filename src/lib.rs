//! Blockchain read operations packaged as agent tools.
//!
//! Every tool receives an injected [`ethereum::ChainClient`]. Tools that take
//! an optional `chainId` query that single chain, or fan out to every chain
//! the client permits and return `[{ "chainId": .., <field>: .. }]`.

pub mod chains;
pub mod config;
pub mod ens;
pub mod error;
pub mod ethereum;
pub mod server;
pub mod tools;
pub mod units;

pub use error::ToolError;
pub use ethereum::{ChainClient, EthereumClient, PublicClient};
pub use tools::{Tool, ToolRegistry};
