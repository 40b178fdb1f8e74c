use thiserror::Error;

/// Failures raised by the tool layer itself. RPC and transport errors are
/// passed through untouched as `anyhow::Error`.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("unknown chain id {0}")]
    UnknownChain(u64),

    #[error("chain {0} is not enabled for this tool or client")]
    ChainNotPermitted(u64),

    #[error("no account configured; set PRIVATE_KEY or ACCOUNT_ADDRESS")]
    NoAccount,

    #[error("{0} not found")]
    NotFound(String),
}

impl ToolError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }
}
